//! JSON output formatter for scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "sets": [
//!     {
//!       "digest": "abc123...",
//!       "occurrences": 3,
//!       "retained": "/exports/c.doc",
//!       "retained_reason": "preferred_extension",
//!       "duplicates": [
//!         { "path": "/exports/a.txt", "size": 1, "action": "listed" },
//!         { "path": "/exports/b.txt", "size": 1, "action": "listed" }
//!       ]
//!     }
//!   ],
//!   "total_duplicate_bytes": 2,
//!   "summary": {
//!     "files_cataloged": 3,
//!     "bytes_cataloged": 3,
//!     "digest_groups": 1,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "scan_duration_ms": 12,
//!     "exit_code": 0,
//!     "exit_code_name": "DD000"
//!   }
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{DedupeReport, DuplicateSet, RetentionReason, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::FileRecord;

/// What happened to a duplicate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateAction {
    /// Reported only
    Listed,
    /// Removed from the filesystem or moved to trash
    Deleted,
}

/// One duplicate file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// Path as cataloged
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// Whether the file was deleted or only listed
    pub action: DuplicateAction,
}

impl JsonDuplicate {
    fn from_record(record: &FileRecord, action: DuplicateAction) -> Self {
        Self {
            path: path_string(&record.path),
            size: record.size,
            action,
        }
    }
}

/// One duplicate set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateSet {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// Number of cataloged files with this digest
    pub occurrences: usize,
    /// The kept path
    pub retained: String,
    /// Why it was kept
    pub retained_reason: RetentionReason,
    /// The removable members
    pub duplicates: Vec<JsonDuplicate>,
}

impl JsonDuplicateSet {
    /// Convert a duplicate set, marking every member with `action`.
    #[must_use]
    pub fn from_set(set: &DuplicateSet, action: DuplicateAction) -> Self {
        Self {
            digest: set.digest_hex(),
            occurrences: set.occurrences,
            retained: path_string(&set.retained),
            retained_reason: set.reason,
            duplicates: set
                .duplicates
                .iter()
                .map(|r| JsonDuplicate::from_record(r, action))
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files that matched an extension
    pub files_cataloged: usize,
    /// Total size of those files in bytes
    pub bytes_cataloged: u64,
    /// Distinct digests
    pub digest_groups: usize,
    /// Digests with at least one duplicate
    pub duplicate_groups: usize,
    /// Files marked as duplicates
    pub duplicate_files: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            files_cataloged: summary.files_cataloged,
            bytes_cataloged: summary.bytes_cataloged,
            digest_groups: summary.digest_groups,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            scan_duration_ms: summary.duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Non-empty duplicate sets, ordered by digest
    pub sets: Vec<JsonDuplicateSet>,
    /// Sum of the sizes of every duplicate
    pub total_duplicate_bytes: u64,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document for a report.
    ///
    /// `action` is applied to every duplicate: [`DuplicateAction::Deleted`]
    /// after a clean run, [`DuplicateAction::Listed`] otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use dedupe::duplicates::DedupeReport;
    /// use dedupe::error::ExitCode;
    /// use dedupe::output::json::{DuplicateAction, JsonOutput};
    ///
    /// let output = JsonOutput::new(&DedupeReport::default(), DuplicateAction::Listed, ExitCode::Success);
    /// assert!(output.sets.is_empty());
    /// assert_eq!(output.total_duplicate_bytes, 0);
    /// ```
    #[must_use]
    pub fn new(report: &DedupeReport, action: DuplicateAction, exit_code: ExitCode) -> Self {
        Self {
            sets: report
                .sets()
                .iter()
                .map(|s| JsonDuplicateSet::from_set(s, action))
                .collect(),
            total_duplicate_bytes: report.total_duplicate_bytes(),
            summary: JsonSummary::from_scan_summary(report.summary(), exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

// Paths are reported as cataloged; deleted files can no longer be canonicalized.
fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
