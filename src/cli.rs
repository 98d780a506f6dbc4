//! Command-line interface definitions.
//!
//! All arguments use the clap derive API. Run options (`--extensions`,
//! `--preferred`, `--clean`, `--trash`, `--delay`, `--io-threads`) are
//! optional here because they can also come from the config file or the
//! environment; see [`crate::config`].
//!
//! # Example
//!
//! ```bash
//! # List duplicate text and Word exports, keeping the .doc copy
//! dedupe --directory ~/exports --extensions txt,doc --preferred doc
//!
//! # Delete them after the countdown, moving files to the trash
//! dedupe --directory ~/exports --extensions txt,doc --preferred doc --clean --trash
//!
//! # Machine-readable listing
//! dedupe --directory ~/photos --extensions jpg,jpeg --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Remove duplicate files by content, keeping one copy per set.
///
/// Files matching the given extensions are hashed (BLAKE3). Every group of
/// byte-identical files keeps one member, preferring the `--preferred`
/// extension when present; the rest are listed or, with `--clean`, deleted.
#[derive(Debug, Parser)]
#[command(name = "dedupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan recursively
    #[arg(short, long, value_name = "DIR", required_unless_present = "print_config")]
    pub directory: Option<PathBuf>,

    /// Comma-separated list of file extensions to consider (e.g. "txt,doc")
    #[arg(short, long, value_name = "LIST")]
    pub extensions: Option<String>,

    /// Extension of the copy to keep in a set of duplicates
    #[arg(short, long, value_name = "EXT")]
    pub preferred: Option<String>,

    /// Delete duplicate files instead of listing them
    #[arg(long)]
    pub clean: bool,

    /// Move deleted files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Seconds to wait before deleting (Ctrl+C to abort)
    #[arg(long, value_name = "SECS")]
    pub delay: Option<u64>,

    /// Number of I/O threads for hashing (default: 4)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub io_threads: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Path to a TOML config file
    ///
    /// Defaults to the platform config directory (dedupe/config.toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per digest and per duplicate
    Text,
    /// A single JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
