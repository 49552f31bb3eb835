//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file bucketing (Phase 1)
//! - Partial fingerprint filtering (Phase 2)
//! - Full content fingerprinting (Phase 3)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanReport, ScanTotals};
pub use groups::{DuplicateGroup, DuplicateGroups, Placement, SizeBuckets};
