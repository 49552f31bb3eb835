//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content
//! fingerprints:
//!
//! - [`Hasher::partial_hash`] digests a bounded window of bytes, used to
//!   cheaply separate same-size files before the full pass
//! - [`Hasher::full_hash`] streams the whole file through the digest
//!
//! Per-file open and stat failures are not errors: they come back as
//! [`FileOutcome::Skipped`] so the caller can log them and move on. A read
//! failure after streaming has started is a [`HashError`], because a partially
//! digested file can be classified neither as unique nor as a duplicate.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::HashError;

/// Default partial fingerprint window in bytes.
pub const PARTIAL_WINDOW: u64 = 2 * 1024;

/// Read buffer size for streaming (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// An opaque content fingerprint (BLAKE3, 32 bytes).
///
/// Compared by value and used as a map key. It has no ordering; group order
/// is decided by candidate paths, never by digest bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding of the full digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First six hex characters, used to label groups in output.
    #[must_use]
    pub fn short_hex(&self) -> String {
        self.0[..3].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl From<blake3::Hash> for Fingerprint {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

/// A fingerprint together with the size reported by the open handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digested {
    /// Content fingerprint
    pub fingerprint: Fingerprint,
    /// File size in bytes, from the same handle that was read
    pub size: u64,
}

/// The step at which a file had to be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    /// The file could not be opened.
    Open,
    /// The open handle could not be stat'ed.
    Stat,
    /// Seeking to the partial window failed.
    Seek,
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipKind::Open => write!(f, "open"),
            SkipKind::Stat => write!(f, "stat"),
            SkipKind::Seek => write!(f, "seek"),
        }
    }
}

/// Why a file was left out of fingerprinting.
#[derive(thiserror::Error, Debug)]
#[error("cannot {kind} {path}: {source}")]
pub struct SkipReason {
    /// The skipped file
    pub path: PathBuf,
    /// Which step failed
    pub kind: SkipKind,
    /// The underlying I/O error
    #[source]
    pub source: io::Error,
}

impl SkipReason {
    fn new(path: &Path, kind: SkipKind, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            source,
        }
    }
}

/// Per-file result of a fingerprinting step.
#[derive(Debug)]
pub enum FileOutcome<T> {
    /// The file was read and produced a value.
    Processed(T),
    /// The file could not be read and is excluded from further grouping.
    Skipped(SkipReason),
}

impl<T> FileOutcome<T> {
    /// The processed value, if any.
    #[must_use]
    pub fn processed(self) -> Option<T> {
        match self {
            FileOutcome::Processed(value) => Some(value),
            FileOutcome::Skipped(_) => None,
        }
    }

    /// Whether the file was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped(_))
    }
}

/// Offset at which the partial window starts for a file of `size` bytes.
///
/// Files at least twice the window long are sampled from the middle; shorter
/// files are sampled from their last `window` bytes, clamped to the start.
///
/// ```
/// use dupsweep::scanner::window_start;
///
/// assert_eq!(window_start(10_000, 2048), 5_000);
/// assert_eq!(window_start(3_000, 2048), 952);
/// assert_eq!(window_start(100, 2048), 0);
/// ```
#[must_use]
pub fn window_start(size: u64, window: u64) -> u64 {
    if size >= window.saturating_mul(2) {
        size / 2
    } else {
        size.saturating_sub(window)
    }
}

/// Streaming BLAKE3 hasher for file content.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64KB read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Digest a window of at most `window` bytes.
    ///
    /// See [`window_start`] for where the window is placed. Reaching end of
    /// file before `window` bytes have been read is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Read`] if reading fails partway through.
    pub fn partial_hash(
        &self,
        path: &Path,
        window: u64,
    ) -> Result<FileOutcome<Digested>, HashError> {
        let (mut file, size) = match open_with_size(path) {
            Ok(opened) => opened,
            Err(reason) => return Ok(FileOutcome::Skipped(reason)),
        };

        let start = window_start(size, window);
        if let Err(e) = file.seek(SeekFrom::Start(start)) {
            return Ok(FileOutcome::Skipped(SkipReason::new(
                path,
                SkipKind::Seek,
                e,
            )));
        }

        let fingerprint = self.digest_stream(&mut file.take(window), path)?;
        log::trace!("Partial hash {} for {}", fingerprint.short_hex(), path.display());

        Ok(FileOutcome::Processed(Digested { fingerprint, size }))
    }

    /// Digest the entire content of a file.
    ///
    /// The size is taken from the already-open handle, so no second lookup
    /// by path is made.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Read`] if reading fails partway through.
    pub fn full_hash(&self, path: &Path) -> Result<FileOutcome<Digested>, HashError> {
        let (mut file, size) = match open_with_size(path) {
            Ok(opened) => opened,
            Err(reason) => return Ok(FileOutcome::Skipped(reason)),
        };

        let fingerprint = self.digest_stream(&mut file, path)?;
        log::trace!("Full hash {} for {}", fingerprint.short_hex(), path.display());

        Ok(FileOutcome::Processed(Digested { fingerprint, size }))
    }

    /// Compare two files byte by byte.
    ///
    /// Used to double-check a digest match when verification is enabled.
    /// A file that cannot be opened yields `Skipped` naming that file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Read`] if either file fails partway through.
    pub fn contents_equal(&self, a: &Path, b: &Path) -> Result<FileOutcome<bool>, HashError> {
        let (mut file_a, size_a) = match open_with_size(a) {
            Ok(opened) => opened,
            Err(reason) => return Ok(FileOutcome::Skipped(reason)),
        };
        let (mut file_b, size_b) = match open_with_size(b) {
            Ok(opened) => opened,
            Err(reason) => return Ok(FileOutcome::Skipped(reason)),
        };

        if size_a != size_b {
            return Ok(FileOutcome::Processed(false));
        }

        let mut buf_a = vec![0u8; self.buffer_size];
        let mut buf_b = vec![0u8; self.buffer_size];
        loop {
            let n = read_full(&mut file_a, &mut buf_a, a)?;
            let m = read_full(&mut file_b, &mut buf_b, b)?;
            if n != m || buf_a[..n] != buf_b[..m] {
                return Ok(FileOutcome::Processed(false));
            }
            if n == 0 {
                return Ok(FileOutcome::Processed(true));
            }
        }
    }

    /// Stream a reader to exhaustion through BLAKE3.
    fn digest_stream<R: Read>(&self, reader: &mut R, path: &Path) -> Result<Fingerprint, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(HashError::Read {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        Ok(hasher.finalize().into())
    }
}

/// Open a file and stat it through the same handle.
fn open_with_size(path: &Path) -> Result<(File, u64), SkipReason> {
    let file = File::open(path).map_err(|e| SkipReason::new(path, SkipKind::Open, e))?;
    let size = file
        .metadata()
        .map_err(|e| SkipReason::new(path, SkipKind::Stat, e))?
        .len();
    Ok((file, size))
}

/// Fill `buf` as far as possible, returning fewer bytes only at end of file.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8], path: &Path) -> Result<usize, HashError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(HashError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    Ok(filled)
}
