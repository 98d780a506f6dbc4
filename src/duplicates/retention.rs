//! Retention selection: which member of a digest group is kept.
//!
//! # Policy
//!
//! 1. If a preferred extension is configured and at least one member has it,
//!    a member with that extension is kept.
//! 2. Otherwise any member of the group is kept.
//!
//! Within the eligible members the lexicographically smallest path wins, so
//! the same tree always yields the same choice. Callers should rely only on
//! the preferred-extension rule, not on which of several eligible members is
//! picked.
//!
//! Selection is pure: it never touches the filesystem.
//!
//! # Example
//!
//! ```
//! use dedupe::duplicates::{DigestGroup, RetentionPolicy, RetentionReason};
//! use dedupe::scanner::Extension;
//! use std::path::{Path, PathBuf};
//!
//! let mut group = DigestGroup::new([0; 32]);
//! group.insert(PathBuf::from("/r/a.txt"));
//! group.insert(PathBuf::from("/r/b.txt"));
//! group.insert(PathBuf::from("/r/c.doc"));
//!
//! let policy = RetentionPolicy::new(Extension::parse("doc"));
//! let retention = policy.split(group).unwrap();
//! assert_eq!(retention.retained, Path::new("/r/c.doc"));
//! assert_eq!(retention.reason, RetentionReason::PreferredExtension);
//! assert_eq!(retention.duplicates.len(), 2);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::groups::DigestGroup;
use crate::scanner::{Digest, Extension};

/// Why a member was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionReason {
    /// The member has the preferred extension.
    PreferredExtension,
    /// No member has the preferred extension (or none is configured).
    Fallback,
    /// The group has a single member.
    Sole,
}

impl fmt::Display for RetentionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreferredExtension => write!(f, "preferred extension"),
            Self::Fallback => write!(f, "fallback"),
            Self::Sole => write!(f, "sole copy"),
        }
    }
}

/// Outcome of selecting the kept member of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retention {
    /// Shared content digest
    pub digest: Digest,
    /// The path that is kept
    pub retained: PathBuf,
    /// Why it was kept
    pub reason: RetentionReason,
    /// Every other member of the group
    pub duplicates: BTreeSet<PathBuf>,
}

impl Retention {
    /// Total members of the group this came from.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.duplicates.len() + 1
    }
}

/// Chooses the member of each group to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    preferred: Option<Extension>,
}

impl RetentionPolicy {
    /// Create a policy with an optional preferred extension.
    #[must_use]
    pub fn new(preferred: Option<Extension>) -> Self {
        Self { preferred }
    }

    /// Pick the member of `group` to keep.
    ///
    /// Returns `None` only for an empty group.
    #[must_use]
    pub fn select<'a>(&self, group: &'a DigestGroup) -> Option<(&'a Path, RetentionReason)> {
        // BTreeSet iteration is ordered, so `find`/`first` give the smallest path.
        let first = group.members.first()?;
        if group.len() == 1 {
            return Some((first.as_path(), RetentionReason::Sole));
        }

        let preferred_match = self
            .preferred
            .as_ref()
            .and_then(|ext| group.members.iter().find(|p| ext.matches(p)));

        Some(match preferred_match {
            Some(path) => (path.as_path(), RetentionReason::PreferredExtension),
            None => (first.as_path(), RetentionReason::Fallback),
        })
    }

    /// Remove the kept member from `group`, leaving its duplicate set.
    ///
    /// Returns `None` only for an empty group. A single-member group yields
    /// an empty duplicate set.
    #[must_use]
    pub fn split(&self, group: DigestGroup) -> Option<Retention> {
        let (retained, reason) = {
            let (path, reason) = self.select(&group)?;
            (path.to_path_buf(), reason)
        };

        let DigestGroup {
            digest,
            mut members,
        } = group;
        members.remove(&retained);

        log::trace!(
            "Keeping {} ({}), {} duplicate(s)",
            retained.display(),
            reason,
            members.len()
        );

        Some(Retention {
            digest,
            retained,
            reason,
            duplicates: members,
        })
    }
}
