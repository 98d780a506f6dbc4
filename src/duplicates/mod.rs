//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest grouping of a completed catalog
//! - Retention selection (which copy is kept)
//! - The engine that runs catalog, grouping and selection end to end

pub mod engine;
pub mod groups;
pub mod retention;

pub use engine::{DedupeEngine, DedupeReport, DuplicateSet, EngineConfig, EngineError, ScanSummary};
pub use groups::{group_by_digest, DigestGroup, DigestGroups, GroupingStats};
pub use retention::{Retention, RetentionPolicy, RetentionReason};
