//! dedupe - extension-aware duplicate file remover
//!
//! Finds byte-identical files among those matching a set of extensions,
//! keeps one copy of each (preferring a chosen extension) and lists or
//! deletes the rest.
//!
//! The decision pipeline lives in [`duplicates::DedupeEngine`]; the
//! filesystem side in [`scanner`] and [`actions`].

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

pub use app::run_app;
