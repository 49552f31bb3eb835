//! File actions module.
//!
//! # Deletion
//!
//! The delete module removes the redundant copies of each duplicate group:
//! - Permanent deletion (default)
//! - Move to system trash (optional, recoverable)
//! - The canonical member of every group is always kept
//!
//! ```no_run
//! use dupsweep::actions::delete::{delete_file, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = delete_file(&path, &DeleteConfig::trash());
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_redundant, delete_to_trash, ensure_distinct_file, group_header,
    permanent_delete, BatchDeleteResult, ConsoleReporter, DeleteConfig, DeleteError,
    DeleteProgressCallback, DeleteResult,
};
