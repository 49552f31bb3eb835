//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Name based exclusion (hidden entries, NAS thumbnail/snapshot/trash folders)
//! - Extension allow-list filtering
//! - Partial-window and full-content fingerprints with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file fingerprinting (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::default().with_extension_list("jpg|png");
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{
    window_start, Digested, FileOutcome, Fingerprint, Hasher, SkipKind, SkipReason,
    PARTIAL_WINDOW,
};
pub use walker::Walker;

/// Extensions scanned when no allow-list is given on the command line.
pub const DEFAULT_EXTENSIONS: &str = "jpg|png|arw|raw|nec|jpeg|mp4|mp3|json|m4a|avi|mpeg|mpg|dat|doc|docx|ppt|pptx|db|txt|zip|gz|bz|7z|tar|rar|bzip|iso|pkg|wav";

/// Name fragments of NAS housekeeping folders that never hold user data.
pub const DEFAULT_EXCLUDE_MARKERS: [&str; 3] = ["@__thumb", "@Recently-Snapshot", "@Recycle"];

/// A regular file discovered during enumeration.
///
/// Files whose size is unique among all scanned files are dropped right
/// after size bucketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path to the file, rooted at one of the scan roots
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl CandidateFile {
    /// Create a new CandidateFile.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// Controls name exclusion, the extension allow-list and symlink handling.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal. Files reached through a link
    /// are reported under their canonical path.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Entries whose name contains any of these fragments are skipped.
    /// Matching directories are not descended into.
    pub exclude_markers: Vec<String>,

    /// Lowercase suffixes without the leading dot, matched against the end
    /// of the lowercase file name. Defaults to [`DEFAULT_EXTENSIONS`].
    /// An empty list accepts every file.
    pub extensions: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: true,
            exclude_markers: DEFAULT_EXCLUDE_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            extensions: parse_extension_list(DEFAULT_EXTENSIONS),
        }
    }
}

impl WalkerConfig {
    /// Replace the allow-list with a pipe-delimited extension list.
    ///
    /// An empty string disables extension filtering.
    #[must_use]
    pub fn with_extension_list(mut self, list: &str) -> Self {
        self.extensions = parse_extension_list(list);
        self
    }

    /// Replace the exclusion markers.
    #[must_use]
    pub fn with_exclude_markers(mut self, markers: Vec<String>) -> Self {
        self.exclude_markers = markers;
        self
    }

    /// Enable or disable hidden entry skipping.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Split a pipe-delimited extension list into normalized extensions.
///
/// Entries are trimmed, lowercased and stripped of a leading dot. Empty
/// entries are dropped, so `""` yields an empty (accept-all) list.
///
/// ```
/// use dupsweep::scanner::parse_extension_list;
///
/// assert_eq!(parse_extension_list("JPG|.png| mp4 "), vec!["jpg", "png", "mp4"]);
/// assert!(parse_extension_list("").is_empty());
/// ```
#[must_use]
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split('|')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path vanished between listing and inspection.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A scan root could not be traversed at all.
    #[error("Cannot traverse root {path}: {source}")]
    RootUnreadable {
        /// The root that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Whether this error prevents the scan from continuing.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RootUnreadable { .. })
    }
}

/// Fatal errors raised while streaming file content into a digest.
///
/// Open and stat failures are not errors; they surface as
/// [`FileOutcome::Skipped`].
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// Reading the file failed partway through.
    #[error("Read failed for {path}: {source}")]
    Read {
        /// Path of the file being digested
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
