//! Output formatters for scan results.
//!
//! This module provides the output formats for a [`DedupeReport`]:
//! - Plain text for the console (default)
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::{DedupeEngine, EngineConfig};
//! use dedupe::error::ExitCode;
//! use dedupe::output::{DuplicateAction, JsonOutput};
//! use dedupe::scanner::ExtensionSet;
//! use std::path::Path;
//!
//! let engine = DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")));
//! let report = engine.run(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&report, DuplicateAction::Listed, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```
//!
//! [`DedupeReport`]: crate::duplicates::DedupeReport

pub mod json;
pub mod text;

pub use json::{DuplicateAction, JsonOutput, JsonOutputError};
pub use text::TextReporter;
