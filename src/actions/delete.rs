//! Removal of duplicate files.
//!
//! # Overview
//!
//! [`Remover`] deletes the files of each [`DuplicateSet`] one at a time:
//! - Permanent deletion (default) or move to the system trash
//! - Re-check of the file's size before removal (TOCTOU guard)
//! - Check that the kept copy of the set still exists
//!
//! Removal is fail-fast. The first failure is returned and nothing after it
//! is attempted; files already removed stay removed.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::actions::{validate_preserves_copy, DeleteConfig, Remover};
//! use dedupe::duplicates::{DedupeEngine, EngineConfig};
//! use dedupe::scanner::ExtensionSet;
//! use std::path::Path;
//!
//! let engine = DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("jpg")));
//! let report = engine.run(Path::new("/photos")).unwrap();
//!
//! let mut remover = Remover::new(DeleteConfig::trash());
//! for set in report.sets() {
//!     validate_preserves_copy(set).unwrap();
//!     for record in &set.duplicates {
//!         let removed = remover.remove(record).unwrap();
//!         println!("deleted: {}", removed.path.display());
//!     }
//! }
//! println!("{}", remover.result().summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::DuplicateSet;
use crate::scanner::FileRecord;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File size changed since it was cataloged.
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("file deletion error for {path}: {source}")]
    PermanentDeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The copy a set keeps is gone, so removing its duplicates would lose the content.
    #[error("retained copy is missing: {0}")]
    RetainedCopyMissing(PathBuf),

    /// A set lists its kept path among its duplicates.
    #[error("refusing to delete retained copy: {0}")]
    RetainedCopySelected(PathBuf),

    /// Removal was stopped by a shutdown request.
    #[error("deletion interrupted by user")]
    Interrupted,

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::RetainedCopyMissing(p)
            | Self::RetainedCopySelected(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::Interrupted => None,
        }
    }

    fn from_metadata(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// How duplicates are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Remove the file from the filesystem.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// How it was removed.
    pub mode: DeleteMode,
}

/// Running totals of a removal pass.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files, in order.
    pub successes: Vec<DeleteResult>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Deleted {} file(s), freed {}",
            self.success_count(),
            ByteSize(self.bytes_freed)
        )
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Permanent removal or trash.
    pub mode: DeleteMode,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            mode: DeleteMode::Permanent,
        }
    }
}

impl DeleteConfig {
    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self {
            mode: DeleteMode::Trash,
        }
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        mode: DeleteMode::Trash,
    })
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `PermanentDeleteFailed` if the removal fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_metadata(path, e))?
        .len();

    fs::remove_file(path).map_err(|source| {
        log::error!("Permanent delete failed for {}: {}", path.display(), source);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        mode: DeleteMode::Permanent,
    })
}

/// Check that `record` still describes the file on disk.
///
/// # Errors
///
/// `Modified` if the size differs, or the metadata error.
pub fn verify_unchanged(record: &FileRecord) -> Result<(), DeleteError> {
    let current = fs::metadata(&record.path)
        .map_err(|e| DeleteError::from_metadata(&record.path, e))?
        .len();
    if current != record.size {
        log::warn!(
            "File modified since scan: {} (size changed from {} to {})",
            record.path.display(),
            record.size,
            current
        );
        return Err(DeleteError::Modified(record.path.clone()));
    }
    Ok(())
}

/// Validate that removing a set's duplicates leaves a copy behind.
///
/// # Errors
///
/// - `RetainedCopySelected` if the kept path is listed as a duplicate
/// - `RetainedCopyMissing` if the kept file no longer exists
pub fn validate_preserves_copy(set: &DuplicateSet) -> Result<(), DeleteError> {
    if set.paths().any(|p| p == set.retained) {
        log::error!(
            "Duplicate set {} lists its retained copy as a duplicate",
            set.digest_hex()
        );
        return Err(DeleteError::RetainedCopySelected(set.retained.clone()));
    }
    if !set.retained.is_file() {
        log::error!("Retained copy vanished: {}", set.retained.display());
        return Err(DeleteError::RetainedCopyMissing(set.retained.clone()));
    }
    Ok(())
}

/// Removes duplicate files and tracks what was removed.
#[derive(Debug, Default)]
pub struct Remover {
    config: DeleteConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
    result: BatchDeleteResult,
}

impl Remover {
    /// Create a remover with the given configuration.
    #[must_use]
    pub fn new(config: DeleteConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
            result: BatchDeleteResult::default(),
        }
    }

    /// Stop before the next removal once the flag is raised.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Remove one duplicate file.
    ///
    /// # Errors
    ///
    /// Any [`DeleteError`]; the caller is expected to stop the run.
    pub fn remove(&mut self, record: &FileRecord) -> Result<&DeleteResult, DeleteError> {
        if self.is_shutdown_requested() {
            return Err(DeleteError::Interrupted);
        }
        verify_unchanged(record)?;

        let removed = match self.config.mode {
            DeleteMode::Permanent => permanent_delete(&record.path)?,
            DeleteMode::Trash => delete_to_trash(&record.path)?,
        };

        self.result.bytes_freed += removed.size;
        self.result.successes.push(removed);
        Ok(&self.result.successes[self.result.successes.len() - 1])
    }

    /// Validate and remove every duplicate of `set`, in order.
    ///
    /// # Errors
    ///
    /// The first [`DeleteError`] met; later files are left untouched.
    pub fn remove_set(&mut self, set: &DuplicateSet) -> Result<usize, DeleteError> {
        validate_preserves_copy(set)?;
        for record in &set.duplicates {
            self.remove(record)?;
        }
        Ok(set.duplicates.len())
    }

    /// Totals so far.
    #[must_use]
    pub fn result(&self) -> &BatchDeleteResult {
        &self.result
    }

    /// Consume the remover, returning its totals.
    #[must_use]
    pub fn into_result(self) -> BatchDeleteResult {
        self.result
    }
}
