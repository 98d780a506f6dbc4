//! Digest grouping of cataloged files.
//!
//! # Overview
//!
//! [`group_by_digest`] partitions a completed [`FileCatalog`] into one
//! [`DigestGroup`] per distinct digest. Grouping only runs on a finished
//! catalog, so retention selection always sees a group's full membership.
//! Groups with a single member are kept in the mapping; they simply never
//! produce a duplicate.
//!
//! # Example
//!
//! ```
//! use dedupe::duplicates::group_by_digest;
//! use dedupe::scanner::{digest_bytes, Extension, FileCatalog, FileRecord};
//! use std::path::PathBuf;
//!
//! let txt = Extension::parse("txt").unwrap();
//! let catalog = FileCatalog::from_records(
//!     PathBuf::from("/r"),
//!     vec![
//!         FileRecord::new(PathBuf::from("/r/a.txt"), txt.clone(), 1, digest_bytes(b"X")),
//!         FileRecord::new(PathBuf::from("/r/b.txt"), txt.clone(), 1, digest_bytes(b"X")),
//!         FileRecord::new(PathBuf::from("/r/c.txt"), txt, 1, digest_bytes(b"Y")),
//!     ],
//! );
//!
//! let (groups, stats) = group_by_digest(&catalog);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(stats.duplicate_groups, 1);
//! assert_eq!(stats.singleton_groups, 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::scanner::{digest_to_hex, Digest, FileCatalog};

/// All cataloged paths sharing one digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// Shared content digest
    pub digest: Digest,
    /// Member paths (unique)
    pub members: BTreeSet<PathBuf>,
}

impl DigestGroup {
    /// Create an empty group for `digest`.
    #[must_use]
    pub fn new(digest: Digest) -> Self {
        Self {
            digest,
            members: BTreeSet::new(),
        }
    }

    /// Add a member. Returns false if the path was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.members.insert(path)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when two or more files share this digest.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

/// Digest groups keyed and ordered by digest.
pub type DigestGroups = BTreeMap<Digest, DigestGroup>;

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Number of cataloged files grouped
    pub total_files: usize,
    /// Number of distinct digests
    pub unique_digests: usize,
    /// Groups with 2+ members
    pub duplicate_groups: usize,
    /// Groups with exactly one member
    pub singleton_groups: usize,
    /// Files in groups with 2+ members
    pub files_in_duplicate_groups: usize,
}

/// Group every cataloged file by its digest.
///
/// Pure: performs no I/O and does not modify the catalog.
#[must_use]
pub fn group_by_digest(catalog: &FileCatalog) -> (DigestGroups, GroupingStats) {
    let mut groups = DigestGroups::new();

    for record in catalog.records() {
        groups
            .entry(record.digest)
            .or_insert_with(|| DigestGroup::new(record.digest))
            .insert(record.path.clone());
    }

    let mut stats = GroupingStats {
        total_files: catalog.len(),
        unique_digests: groups.len(),
        ..Default::default()
    };
    for group in groups.values() {
        if group.has_duplicates() {
            stats.duplicate_groups += 1;
            stats.files_in_duplicate_groups += group.len();
        } else {
            stats.singleton_groups += 1;
        }
    }

    log::debug!(
        "Grouped {} files into {} digests ({} with duplicates)",
        stats.total_files,
        stats.unique_digests,
        stats.duplicate_groups
    );

    (groups, stats)
}
