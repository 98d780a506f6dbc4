//! Extension parsing and matching.
//!
//! Extensions are compared case-sensitively and always carry their leading
//! separator (`.txt`). A file's extension is the suffix of its file name that
//! starts at the last `.`, so `archive.tar.gz` matches `.gz` and a dotfile
//! named `.txt` matches `.txt`.
//!
//! # Example
//!
//! ```
//! use dedupe::scanner::{Extension, ExtensionSet};
//! use std::path::Path;
//!
//! let set = ExtensionSet::parse(" txt, .doc ,,");
//! assert_eq!(set.len(), 2);
//! assert!(set.matches(Path::new("/photos/a.txt")).is_some());
//! assert!(set.matches(Path::new("/photos/a.TXT")).is_none());
//!
//! let preferred = Extension::parse("doc").unwrap();
//! assert_eq!(preferred.as_str(), ".doc");
//! ```

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// A single normalized extension, always stored with its leading `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Extension(String);

impl Extension {
    /// Normalize a user-supplied extension.
    ///
    /// All whitespace is removed and one leading `.` is accepted, so `txt`,
    /// `.txt` and ` t xt ` all become `.txt`. Returns `None` when nothing is
    /// left after normalization.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let bare = cleaned.strip_prefix('.').unwrap_or(&cleaned);
        if bare.is_empty() {
            None
        } else {
            Some(Self(format!(".{bare}")))
        }
    }

    /// The extension including its leading `.`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether `path` has exactly this extension.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        dotted_extension(path) == Some(self.0.as_bytes())
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The configured set of extensions a file must match to be cataloged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: Vec<Extension>,
}

impl ExtensionSet {
    /// Parse a comma-separated list such as `"jpg, png,.gif"`.
    ///
    /// Whitespace is ignored, empty entries are dropped and repeated entries
    /// are kept once.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        list.split(',').filter_map(Extension::parse).collect()
    }

    /// Number of distinct extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// True when no extension is configured (nothing would ever match).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Iterate over the configured extensions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    /// Return the configured extension `path` matches, if any.
    #[must_use]
    pub fn matches(&self, path: &Path) -> Option<&Extension> {
        let ext = dotted_extension(path)?;
        self.extensions.iter().find(|e| e.as_str().as_bytes() == ext)
    }
}

impl FromIterator<Extension> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        let mut extensions: Vec<Extension> = Vec::new();
        for ext in iter {
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        Self { extensions }
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.extensions.iter().map(Extension::as_str).collect();
        f.write_str(&joined.join(","))
    }
}

/// Suffix of the file name starting at its last `.`, if there is one.
///
/// Works on the raw name bytes, so names that are not valid UTF-8 still
/// yield their extension.
#[must_use]
pub fn dotted_extension(path: &Path) -> Option<&[u8]> {
    let name = path.file_name()?.as_encoded_bytes();
    name.iter().rposition(|&b| b == b'.').map(|idx| &name[idx..])
}
