//! Plain-text console output.
//!
//! The format is line oriented so it can be piped into other tools:
//!
//! ```text
//! <digest-hex>  ->  <occurrences>
//! /exports/a.txt
//! /exports/b.txt
//! total duplicate bytes:  2
//! ```
//!
//! In clean mode each duplicate line becomes `deleted:  <path>` and is
//! written only after the file is gone.

use std::io::{self, Write};
use std::path::Path;

use crate::duplicates::{DedupeReport, DuplicateSet};

/// Line-oriented writer for scan results.
#[derive(Debug)]
pub struct TextReporter<W: Write> {
    writer: W,
}

impl<W: Write> TextReporter<W> {
    /// Wrap a writer (usually locked stdout).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// `<digest-hex>  ->  <occurrences>`
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn set_header(&mut self, set: &DuplicateSet) -> io::Result<()> {
        writeln!(self.writer, "{}  ->  {}", set.digest_hex(), set.occurrences)
    }

    /// A duplicate that is only reported.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn listed(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.writer, "{}", path.display())
    }

    /// A duplicate that was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn deleted(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.writer, "deleted:  {}", path.display())?;
        self.writer.flush()
    }

    /// The closing byte total.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn total(&mut self, bytes: u64) -> io::Result<()> {
        writeln!(self.writer, "total duplicate bytes:  {bytes}")?;
        self.writer.flush()
    }

    /// Write a whole report in listing mode.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_listing(&mut self, report: &DedupeReport) -> io::Result<()> {
        for set in report.sets() {
            self.set_header(set)?;
            for path in set.paths() {
                self.listed(path)?;
            }
        }
        self.total(report.total_duplicate_bytes())
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
