//! Deduplication engine: catalog, group, select, account.
//!
//! # Overview
//!
//! [`DedupeEngine::run`] drives the whole decision pipeline for one root:
//! 1. **Catalog** - walk and hash every matching file ([`FileCatalog`])
//! 2. **Group** - partition by digest ([`group_by_digest`])
//! 3. **Select** - keep one member per group ([`RetentionPolicy`])
//!
//! The result is a [`DedupeReport`]: the non-empty duplicate sets, the
//! occurrence count of every digest, and the total size of all duplicates.
//! The engine never modifies the filesystem; removal is driven by the caller
//! from the report.
//!
//! All run state lives in the call, so one engine can be reused across runs.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::{DedupeEngine, EngineConfig};
//! use dedupe::scanner::{Extension, ExtensionSet};
//! use std::path::Path;
//!
//! let config = EngineConfig::new(ExtensionSet::parse("txt,doc"))
//!     .with_preferred(Extension::parse("doc"));
//! let engine = DedupeEngine::new(config);
//! let report = engine.run(Path::new("/exports")).unwrap();
//!
//! for set in report.sets() {
//!     println!("{} -> {}", set.digest_hex(), set.occurrences);
//! }
//! println!("total duplicate bytes: {}", report.total_duplicate_bytes());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{group_by_digest, GroupingStats};
use super::retention::{RetentionPolicy, RetentionReason};
use crate::progress::ProgressCallback;
use crate::scanner::catalog::DEFAULT_IO_THREADS;
use crate::scanner::{
    digest_to_hex, CatalogConfig, Digest, Extension, ExtensionSet, FileCatalog, FileRecord,
    Hasher, ScanError,
};

/// The removable members of one digest group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    /// Shared content digest
    pub digest: Digest,
    /// Number of cataloged files with this digest (kept one included)
    pub occurrences: usize,
    /// The member that is kept
    pub retained: PathBuf,
    /// Why it was kept
    pub reason: RetentionReason,
    /// Records of every other member, ordered by path
    pub duplicates: Vec<FileRecord>,
}

impl DuplicateSet {
    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Sum of the sizes of the duplicate files.
    #[must_use]
    pub fn duplicate_bytes(&self) -> u64 {
        self.duplicates.iter().map(|r| r.size).sum()
    }

    /// Paths of the duplicate files.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.duplicates.iter().map(|r| r.path.as_path())
    }
}

/// Summary statistics of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of files that matched an extension
    pub files_cataloged: usize,
    /// Total size of cataloged files
    pub bytes_cataloged: u64,
    /// Number of distinct digests
    pub digest_groups: usize,
    /// Number of digests with at least one duplicate
    pub duplicate_groups: usize,
    /// Number of files marked as duplicates
    pub duplicate_files: usize,
    /// Total size of all duplicates
    pub duplicate_bytes: u64,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ScanSummary {
    /// Format the duplicate byte total as a human-readable string.
    #[must_use]
    pub fn duplicate_bytes_display(&self) -> String {
        ByteSize(self.duplicate_bytes).to_string()
    }

    /// Format the cataloged byte total as a human-readable string.
    #[must_use]
    pub fn bytes_cataloged_display(&self) -> String {
        ByteSize(self.bytes_cataloged).to_string()
    }
}

/// Result of an engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeReport {
    sets: Vec<DuplicateSet>,
    occurrences: BTreeMap<Digest, usize>,
    summary: ScanSummary,
}

impl DedupeReport {
    /// Non-empty duplicate sets, ordered by digest.
    #[must_use]
    pub fn sets(&self) -> &[DuplicateSet] {
        &self.sets
    }

    /// Occurrence count of every cataloged digest, including singletons.
    #[must_use]
    pub fn occurrences(&self) -> &BTreeMap<Digest, usize> {
        &self.occurrences
    }

    /// Occurrence count of one digest (0 if never seen).
    #[must_use]
    pub fn occurrences_of(&self, digest: &Digest) -> usize {
        self.occurrences.get(digest).copied().unwrap_or(0)
    }

    /// Total size of every file in every duplicate set.
    #[must_use]
    pub fn total_duplicate_bytes(&self) -> u64 {
        self.summary.duplicate_bytes
    }

    /// Run statistics.
    #[must_use]
    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    /// True when nothing is removable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Every duplicate record across all sets.
    pub fn duplicates(&self) -> impl Iterator<Item = &FileRecord> {
        self.sets.iter().flat_map(|s| s.duplicates.iter())
    }
}

/// Errors that can occur during an engine run.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The run was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The root does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Traversal or hashing failed.
    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for EngineError {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::Interrupted => Self::Interrupted,
            other => Self::Scan(other),
        }
    }
}

/// Configuration for the engine.
#[derive(Clone)]
pub struct EngineConfig {
    /// Extensions a file must have to be considered.
    pub extensions: ExtensionSet,
    /// Extension whose presence decides the kept member.
    pub preferred: Option<Extension>,
    /// Number of hashing threads.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("extensions", &self.extensions)
            .field("preferred", &self.preferred)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl EngineConfig {
    /// Create a configuration with no preferred extension.
    #[must_use]
    pub fn new(extensions: ExtensionSet) -> Self {
        Self {
            extensions,
            preferred: None,
            io_threads: DEFAULT_IO_THREADS,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the preferred extension (`None` means no preference).
    #[must_use]
    pub fn with_preferred(mut self, preferred: Option<Extension>) -> Self {
        self.preferred = preferred;
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn catalog_config(&self) -> CatalogConfig {
        let mut config =
            CatalogConfig::new(self.extensions.clone()).with_io_threads(self.io_threads);
        if let Some(ref flag) = self.shutdown_flag {
            config = config.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.progress_callback {
            config = config.with_progress_callback(callback.clone());
        }
        config
    }
}

/// Orchestrates catalog construction, grouping and retention selection.
#[derive(Debug)]
pub struct DedupeEngine {
    config: EngineConfig,
    policy: RetentionPolicy,
    hasher: Hasher,
}

impl DedupeEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self {
            policy: RetentionPolicy::new(config.preferred.clone()),
            config,
            hasher,
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalog `root` and classify every matching file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the root is missing or not a directory, if
    /// any traversal or hashing step fails, or if shutdown was requested.
    /// Nothing is reported on error.
    pub fn run(&self, root: &Path) -> Result<DedupeReport, EngineError> {
        let start_time = Instant::now();

        if self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        let catalog = FileCatalog::build(root, &self.config.catalog_config(), &self.hasher)
            .map_err(|e| match e {
                ScanError::NotFound(p) if p == root => EngineError::PathNotFound(p),
                ScanError::NotADirectory(p) => EngineError::NotADirectory(p),
                other => EngineError::from(other),
            })?;

        if self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        let mut report = self.evaluate(&catalog);
        report.summary.duration = start_time.elapsed();

        log::info!(
            "Scan of {} complete: {} files, {} duplicate groups, {} duplicate files, {} reclaimable",
            catalog.root().display(),
            report.summary.files_cataloged,
            report.summary.duplicate_groups,
            report.summary.duplicate_files,
            report.summary.duplicate_bytes_display()
        );

        Ok(report)
    }

    /// Group and select over an already-built catalog.
    ///
    /// Pure: performs no I/O.
    #[must_use]
    pub fn evaluate(&self, catalog: &FileCatalog) -> DedupeReport {
        let (groups, stats) = group_by_digest(catalog);
        let GroupingStats {
            total_files,
            unique_digests,
            ..
        } = stats;

        let mut report = DedupeReport {
            summary: ScanSummary {
                files_cataloged: total_files,
                bytes_cataloged: catalog.total_size(),
                digest_groups: unique_digests,
                ..Default::default()
            },
            ..Default::default()
        };

        for group in groups.into_values() {
            report.occurrences.insert(group.digest, group.len());

            let Some(retention) = self.policy.split(group) else {
                continue;
            };
            if retention.duplicates.is_empty() {
                continue;
            }

            let duplicates: Vec<FileRecord> = retention
                .duplicates
                .iter()
                .filter_map(|path| catalog.get(path).cloned())
                .collect();

            let set = DuplicateSet {
                digest: retention.digest,
                occurrences: retention.occurrences(),
                retained: retention.retained,
                reason: retention.reason,
                duplicates,
            };

            log::debug!(
                "{}: keeping {} ({}), {} duplicate(s)",
                set.digest_hex(),
                set.retained.display(),
                set.reason,
                set.duplicates.len()
            );

            report.summary.duplicate_groups += 1;
            report.summary.duplicate_files += set.duplicates.len();
            report.summary.duplicate_bytes += set.duplicate_bytes();
            report.sets.push(set);
        }

        report
    }
}
