//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting `(path, size)` pairs for duplicate detection.
//!
//! # Features
//!
//! - Deterministic traversal (children sorted by file name)
//! - Hidden entry and marker based exclusion with subtree pruning
//! - Case-insensitive extension allow-list
//! - Optional symlink following; a followed link is reported under its
//!   target's canonical path
//!
//! Traversal errors below the root are yielded as [`ScanError`] values and
//! iteration continues. An error at the root itself is reported as
//! [`ScanError::RootUnreadable`].
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{CandidateFile, ScanError, WalkerConfig};

/// Directory walker for sequential file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Check whether an entry name is excluded.
    ///
    /// Only the entry's own name is inspected; excluded directories are
    /// pruned, so every ancestor below the root has already passed.
    fn is_excluded(&self, name: &str) -> bool {
        if self.config.skip_hidden && name.starts_with('.') {
            return true;
        }
        self.config
            .exclude_markers
            .iter()
            .any(|marker| !marker.is_empty() && name.contains(marker.as_str()))
    }

    /// Check if a file passes the extension allow-list.
    fn passes_extension_filter(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        self.config
            .extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }

    /// Walk the directory tree, yielding candidate files.
    ///
    /// Returns an iterator over [`CandidateFile`] results. Errors are
    /// yielded as [`ScanError`] values rather than stopping iteration; the
    /// caller decides which of them are fatal.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<CandidateFile, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let excluded = self.is_excluded(&entry.file_name().to_string_lossy());
                if excluded {
                    log::trace!("Excluding: {}", entry.path().display());
                }
                !excluded
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Turn a directory entry into a candidate, if it is an accepted regular file.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<CandidateFile, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() && !self.config.follow_symlinks {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !self.passes_extension_filter(entry.path()) {
            log::trace!(
                "Skipping file due to extension filter: {}",
                entry.path().display()
            );
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };

        if !metadata.is_file() {
            return None;
        }

        // A followed link is reported under its target's path, so a link and
        // its target collapse into one candidate.
        let path = if self.config.follow_symlinks {
            match fs::canonicalize(entry.path()) {
                Ok(resolved) => resolved,
                Err(e) => return Some(Err(self.scan_error(entry.into_path(), e))),
            }
        } else {
            entry.into_path()
        };

        Some(Ok(CandidateFile::new(path, metadata.len())))
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let depth = error.depth();
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let source = io::Error::from(error);

        if depth == 0 {
            log::error!("Cannot traverse {}: {}", path.display(), source);
            return ScanError::RootUnreadable { path, source };
        }

        self.scan_error(path, source)
    }

    /// Classify a recoverable I/O failure below the root, logging it.
    fn scan_error(&self, path: PathBuf, source: io::Error) -> ScanError {
        match source.kind() {
            io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            io::ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), source);
                ScanError::Io { path, source }
            }
        }
    }
}
