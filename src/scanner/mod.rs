//! Scanner module for directory traversal, extension filtering and hashing.
//!
//! This module provides functionality for:
//! - Deterministic recursive directory walking using jwalk
//! - Extension matching against a configured set
//! - Content hashing with BLAKE3 (streaming)
//! - Building the [`FileCatalog`] the duplicate engine works on
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`extensions`]: Extension normalization and matching
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: BLAKE3 file hashing
//! - [`catalog`]: Walk + hash into immutable [`FileRecord`]s
//!
//! # Example
//!
//! ```no_run
//! use dedupe::scanner::{CatalogConfig, ExtensionSet, FileCatalog, Hasher};
//! use std::path::Path;
//!
//! let config = CatalogConfig::new(ExtensionSet::parse("jpg,png"));
//! let catalog = FileCatalog::build(Path::new("/photos"), &config, &Hasher::new()).unwrap();
//! for record in catalog.records() {
//!     println!("{}: {} bytes", record.path.display(), record.size);
//! }
//! ```

pub mod catalog;
pub mod extensions;
pub mod hasher;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use catalog::{CatalogConfig, FileCatalog};
pub use extensions::{Extension, ExtensionSet};
pub use hasher::{digest_bytes, digest_to_hex, Digest, Hasher};
pub use walker::{CandidateFile, Walker};

/// Metadata for one cataloged file.
///
/// Created once per matched file during traversal and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file as discovered under the scan root
    pub path: PathBuf,
    /// The configured extension the file matched
    pub extension: Extension,
    /// File size in bytes
    pub size: u64,
    /// Content digest
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(path: PathBuf, extension: Extension, size: u64, digest: Digest) -> Self {
        Self {
            path,
            extension,
            size,
            digest,
        }
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

/// Errors that can occur during directory scanning.
///
/// Every variant is fatal to the run.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A matched file could not be hashed.
    #[error("checksum error: {0}")]
    Hash(#[from] HashError),

    /// The scan was stopped by a shutdown request.
    #[error("Scan interrupted")]
    Interrupted,
}

impl ScanError {
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Interrupted(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
