//! File actions module.
//!
//! This module provides removal of the duplicates a scan reports:
//! - Permanent deletion (default)
//! - Move to the system trash via the trash crate
//! - TOCTOU verification to detect modified files
//! - A check that each set's kept copy still exists
//!
//! ```no_run
//! use dedupe::actions::{delete_to_trash, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = delete_to_trash(&path);
//! ```

pub mod delete;

pub use delete::{
    delete_to_trash, permanent_delete, validate_preserves_copy, verify_unchanged,
    BatchDeleteResult, DeleteConfig, DeleteError, DeleteMode, DeleteResult, Remover,
};
