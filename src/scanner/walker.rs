//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! [`Walker`] visits every entry below a root directory and yields the
//! regular files whose extension is in the configured [`ExtensionSet`].
//! Directories are descended into but never matched. Children are sorted by
//! file name, so the yield order is stable for an unmodified tree.
//!
//! Errors are yielded as [`ScanError`] values; the catalog stops at the
//! first one.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::scanner::{ExtensionSet, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Documents"), ExtensionSet::parse("pdf"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::{Extension, ExtensionSet, ScanError};
use crate::progress::ProgressCallback;

/// A file that passed the extension filter but has not been hashed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path to the file
    pub path: PathBuf,
    /// The configured extension it matched
    pub extension: Extension,
    /// File size in bytes (from metadata, following links)
    pub size: u64,
}

/// Directory walker for file discovery.
pub struct Walker {
    root: PathBuf,
    extensions: ExtensionSet,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .field("shutdown_flag", &self.shutdown_flag)
            .finish_non_exhaustive()
    }
}

impl Walker {
    /// Create a new walker for the given root and extension set.
    #[must_use]
    pub fn new(root: &Path, extensions: ExtensionSet) -> Self {
        Self {
            root: root.to_path_buf(),
            extensions,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is raised the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report each matched file to a progress callback.
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

    /// Walk the directory tree, yielding matched files in sorted order.
    pub fn walk(&self) -> impl Iterator<Item = Result<CandidateFile, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .skip_hidden(false)
            .sort(true);

        let mut matched = 0usize;

        walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(mut entry) => {
                    if entry.file_type().is_dir() {
                        // jwalk reports an unreadable directory on its own entry.
                        let error = entry.read_children_error.take()?;
                        let path = entry.path();
                        log::warn!("Cannot read directory {}: {}", path.display(), error);
                        return Some(Err(walk_error(path, error)));
                    }

                    let path = entry.path();
                    let Some(extension) = self.extensions.matches(&path).cloned() else {
                        log::trace!("Extension not selected: {}", path.display());
                        return None;
                    };

                    let result = self.candidate(path, extension)?;
                    if let (Ok(file), Some(callback)) = (&result, &self.progress_callback) {
                        matched += 1;
                        callback.on_progress(matched, file.path.to_string_lossy().as_ref());
                    }
                    Some(result)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(walk_error(path, e)))
                }
            }
        })
    }

    /// Read metadata for a matched path.
    ///
    /// Returns `None` for entries that are not regular files once links are
    /// followed.
    fn candidate(
        &self,
        path: PathBuf,
        extension: Extension,
    ) -> Option<Result<CandidateFile, ScanError>> {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => return Some(Err(ScanError::from_io(&path, e))),
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular entry: {}", path.display());
            return None;
        }

        Some(Ok(CandidateFile {
            path,
            extension,
            size: metadata.len(),
        }))
    }
}

/// Map a jwalk error onto the scan error for `path`.
fn walk_error(path: PathBuf, error: jwalk::Error) -> ScanError {
    let message = error.to_string();
    let io_error = error
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    ScanError::from_io(&path, io_error)
}
