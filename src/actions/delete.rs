//! Removal of redundant copies.
//!
//! # Overview
//!
//! This module provides best-effort deletion of duplicate files:
//! - Permanent deletion (default)
//! - Move to system trash (optional, recoverable)
//! - Group-wise removal that always keeps the canonical member
//!
//! A failure on one file is recorded and never stops the remaining
//! deletions. There is no rollback.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! match permanent_delete(&path) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("delete failed for {path}: {source}")]
    PermanentDeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The copy resolves to the same file as the member being kept.
    #[error("{path} is the same file as {canonical}")]
    SameFileAsCanonical { path: PathBuf, canonical: PathBuf },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// Results of a batch deletion operation.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.success_count(),
                ByteSize(self.bytes_freed)
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                ByteSize(self.bytes_freed)
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Move files to the system trash instead of removing them.
    pub trash: bool,
}

impl DeleteConfig {
    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self { trash: false }
    }

    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self { trash: true }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback {
    /// Called once per group, before its redundant members are deleted.
    fn on_group(&self, group: &DuplicateGroup);

    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path);

    /// Called after failed deletion.
    fn on_delete_failure(&self, _path: &Path, _error: &str) {}

    /// Called when the whole operation completes.
    fn on_complete(&self, _result: &BatchDeleteResult) {}
}

/// Console reporter printing one header per group and one line per copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a reporter; a quiet reporter prints nothing.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl DeleteProgressCallback for ConsoleReporter {
    fn on_group(&self, group: &DuplicateGroup) {
        if !self.quiet {
            println!("\n{}", group_header(group));
        }
    }

    fn on_before_delete(&self, path: &Path) {
        if !self.quiet {
            println!("  Deleting copy {}", path.display());
        }
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        if !self.quiet {
            println!("  Failed to delete {}: {}", path.display(), error);
        }
    }

    fn on_complete(&self, result: &BatchDeleteResult) {
        if !self.quiet {
            println!("\n{}", result.summary());
        }
    }
}

/// Header line announcing a group before its copies are removed.
#[must_use]
pub fn group_header(group: &DuplicateGroup) -> String {
    format!(
        "Group {}: {} copies ({} each)",
        group.fingerprint.short_hex(),
        group.len(),
        ByteSize(group.size)
    )
}

fn map_metadata_error(path: &Path, e: io::Error) -> DeleteError {
    match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Delete a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file can't be inspected
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| map_metadata_error(path, e))?
        .len();

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if the file can't be inspected
/// - `PermanentDeleteFailed` if the removal fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| map_metadata_error(path, e))?
        .len();

    fs::remove_file(path).map_err(|source| {
        log::error!("Delete failed for {}: {}", path.display(), source);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Delete one file as configured.
///
/// # Errors
///
/// See [`permanent_delete`] and [`delete_to_trash`].
pub fn delete_file(path: &Path, config: &DeleteConfig) -> Result<DeleteResult, DeleteError> {
    if config.trash {
        delete_to_trash(path)
    } else {
        permanent_delete(path)
    }
}

/// Refuse to delete a copy that resolves to the same file as the kept member.
///
/// This happens when one of the two is a symbolic link to the other, or
/// when both are reached through linked directories. Deleting the copy would
/// leave nothing but a dangling link.
///
/// # Errors
///
/// - `SameFileAsCanonical` if both paths resolve to one file
/// - `NotFound`, `PermissionDenied` or `Io` if either path can't be resolved
pub fn ensure_distinct_file(path: &Path, canonical: &Path) -> Result<(), DeleteError> {
    let resolved = fs::canonicalize(path).map_err(|e| map_metadata_error(path, e))?;
    let kept = fs::canonicalize(canonical).map_err(|e| map_metadata_error(canonical, e))?;

    if resolved == kept {
        log::error!(
            "Refusing to delete {}: it is the same file as {}",
            path.display(),
            canonical.display()
        );
        return Err(DeleteError::SameFileAsCanonical {
            path: path.to_path_buf(),
            canonical: canonical.to_path_buf(),
        });
    }
    Ok(())
}

/// Remove every redundant member of every group, keeping the canonical one.
///
/// Groups with fewer than two members are ignored. A copy that resolves to
/// the same file as the kept member is never deleted. Each attempt is
/// logged; failures are collected and the remaining files are still
/// processed.
pub fn delete_redundant<'a, I, C>(
    groups: I,
    config: &DeleteConfig,
    callback: &C,
) -> BatchDeleteResult
where
    I: IntoIterator<Item = &'a DuplicateGroup>,
    C: DeleteProgressCallback + ?Sized,
{
    let mut result = BatchDeleteResult::default();

    for group in groups.into_iter().filter(|g| g.is_duplicate()) {
        callback.on_group(group);
        log::debug!(
            "Keeping {} and removing {} copies",
            group.canonical().display(),
            group.redundant().len()
        );

        for path in group.redundant() {
            callback.on_before_delete(path);

            match ensure_distinct_file(path, group.canonical())
                .and_then(|()| delete_file(path, config))
            {
                Ok(del) => {
                    result.bytes_freed += del.size;
                    result.successes.push(del);
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    log::warn!("Failed to delete {}: {}", path.display(), error_msg);
                    callback.on_delete_failure(path, &error_msg);
                    result.failures.push((path.clone(), error_msg));
                }
            }
        }
    }

    callback.on_complete(&result);
    log::info!("{}", result.summary());

    result
}
