//! File catalog: every matched file under a root, with size and digest.
//!
//! # Overview
//!
//! [`FileCatalog::build`] walks the root with a [`Walker`], then hashes
//! every candidate on a bounded rayon pool. Results are collected back in
//! walk order, so the catalog of an unmodified tree is identical from run to
//! run regardless of how many hashing threads were used.
//!
//! The build is fail-fast: the first traversal or hashing error aborts it and
//! no partial catalog is returned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::walker::CandidateFile;
use super::{ExtensionSet, FileRecord, HashError, Hasher, ScanError, Walker};
use crate::progress::{ProgressCallback, PHASE_HASH, PHASE_WALK};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration for building a catalog.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Extensions a file must have to be cataloged.
    pub extensions: ExtensionSet,
    /// Number of threads hashing files concurrently (at least 1).
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("extensions", &self.extensions)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl CatalogConfig {
    /// Create a configuration matching `extensions` with default threading.
    #[must_use]
    pub fn new(extensions: ExtensionSet) -> Self {
        Self {
            extensions,
            io_threads: DEFAULT_IO_THREADS,
            shutdown_flag: None,
            progress_callback: None,
        }
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
}

/// Immutable set of [`FileRecord`]s discovered under one root.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    root: PathBuf,
    records: Vec<FileRecord>,
    index: HashMap<PathBuf, usize>,
}

impl FileCatalog {
    /// Walk `root` and hash every file whose extension is configured.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] / [`ScanError::NotADirectory`] for a bad root
    /// - any traversal or metadata error met during the walk
    /// - [`ScanError::Hash`] when a matched file cannot be read
    /// - [`ScanError::Interrupted`] when shutdown was requested
    pub fn build(root: &Path, config: &CatalogConfig, hasher: &Hasher) -> Result<Self, ScanError> {
        let metadata = std::fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        log::info!(
            "Cataloging {} for extensions {}",
            root.display(),
            config.extensions
        );

        let candidates = Self::walk(root, config)?;
        if config.is_shutdown_requested() {
            return Err(ScanError::Interrupted);
        }

        let total_bytes: u64 = candidates.iter().map(|c| c.size).sum();
        log::info!(
            "Found {} matching files ({} bytes), hashing with {} thread(s)",
            candidates.len(),
            total_bytes,
            config.io_threads
        );

        let records = Self::hash_all(candidates, config, hasher)?;
        if config.is_shutdown_requested() {
            return Err(ScanError::Interrupted);
        }

        Ok(Self::from_records(root.to_path_buf(), records))
    }

    /// Build a catalog from records that were produced elsewhere.
    ///
    /// A path seen twice keeps its first record.
    #[must_use]
    pub fn from_records(root: PathBuf, records: Vec<FileRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if index.contains_key(&record.path) {
                log::warn!("Ignoring repeated catalog path: {}", record.path.display());
                continue;
            }
            index.insert(record.path.clone(), unique.len());
            unique.push(record);
        }
        Self {
            root,
            records: unique,
            index,
        }
    }

    fn walk(root: &Path, config: &CatalogConfig) -> Result<Vec<CandidateFile>, ScanError> {
        let mut walker = Walker::new(root, config.extensions.clone());
        if let Some(ref flag) = config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = config.progress_callback {
            callback.on_phase_start(PHASE_WALK, 0);
            walker = walker.with_progress_callback(callback.clone());
        }

        let candidates = walker.walk().collect::<Result<Vec<_>, _>>();

        if let Some(ref callback) = config.progress_callback {
            callback.on_phase_end(PHASE_WALK);
        }
        candidates
    }

    fn hash_all(
        candidates: Vec<CandidateFile>,
        config: &CatalogConfig,
        hasher: &Hasher,
    ) -> Result<Vec<FileRecord>, ScanError> {
        if let Some(ref callback) = config.progress_callback {
            callback.on_phase_start(PHASE_HASH, candidates.len());
        }

        let completed = AtomicUsize::new(0);
        let hash_one = |candidate: CandidateFile| -> Result<FileRecord, HashError> {
            let digest = hasher.digest_file(&candidate.path)?;
            if let Some(ref callback) = config.progress_callback {
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                callback.on_progress(done, candidate.path.to_string_lossy().as_ref());
                callback.on_item_completed(candidate.size);
            }
            Ok(FileRecord::new(
                candidate.path,
                candidate.extension,
                candidate.size,
                digest,
            ))
        };

        let result: Result<Vec<FileRecord>, HashError> = match rayon::ThreadPoolBuilder::new()
            .num_threads(config.io_threads.max(1))
            .build()
        {
            Ok(pool) => pool.install(|| candidates.into_par_iter().map(&hash_one).collect()),
            Err(e) => {
                log::warn!("Failed to create hashing pool ({}), hashing sequentially", e);
                candidates.into_iter().map(&hash_one).collect()
            }
        };

        if let Some(ref callback) = config.progress_callback {
            callback.on_phase_end(PHASE_HASH);
        }

        result.map_err(|e| match e {
            HashError::Interrupted(_) => ScanError::Interrupted,
            other => {
                log::error!("Failed to hash {}: {}", other.path().display(), other);
                ScanError::Hash(other)
            }
        })
    }

    /// The directory this catalog was built from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All records, in walk order.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Look up the record for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.index.get(path).map(|&idx| &self.records[idx])
    }

    /// Number of cataloged files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no file matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all cataloged file sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}
