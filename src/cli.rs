//! Command-line interface definitions for dupsweep.
//!
//! This module defines all CLI arguments using the clap derive API.
//! Single-dash long flags (`-ext=jpg|png`, `-disable-smallhash`) are
//! accepted too; [`normalize_legacy_args`] rewrites them before parsing.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two trees
//! dupsweep ~/Photos /mnt/backup/Photos
//!
//! # Consider every file, then delete redundant copies
//! dupsweep -r --ext= ~/Downloads
//!
//! # Move redundant copies to the trash instead
//! dupsweep -r --trash ~/Downloads
//! ```

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long options that may also be written with a single dash.
const LEGACY_LONG_FLAGS: [&str; 8] = [
    "ext",
    "disable-smallhash",
    "verify",
    "trash",
    "verbose",
    "quiet",
    "no-progress",
    "config",
];

/// Find and remove duplicate files across directory trees.
///
/// Files are compared by size, then by a BLAKE3 fingerprint of a small
/// window, then by a fingerprint of the whole content. In each group of
/// identical files the one with the smallest path is kept.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Directories to scan
    #[arg(value_name = "ROOTS", required_unless_present = "version")]
    pub roots: Vec<PathBuf>,

    /// Delete redundant copies after the scan
    #[arg(short, long)]
    pub remove: bool,

    /// Pipe-delimited extensions to scan, e.g. "jpg|png"; empty scans every file
    ///
    /// Defaults to a list of common media, document and archive extensions.
    #[arg(long, value_name = "LIST")]
    pub ext: Option<String>,

    /// Skip the partial fingerprint pass
    #[arg(long)]
    pub disable_smallhash: bool,

    /// Show version and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Compare matching files byte by byte before grouping them
    #[arg(long)]
    pub verify: bool,

    /// Move redundant copies to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Increase log verbosity (repeat for trace)
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// The line printed by `-v`.
///
/// ```
/// let line = dupsweep::cli::version_string();
/// assert!(line.starts_with("version "));
/// assert!(line.contains("_rustc_"));
/// ```
#[must_use]
pub fn version_string() -> String {
    format!(
        "version {}_rustc_{}_{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Rewrite single-dash long flags to their double-dash form.
///
/// `-ext=jpg` becomes `--ext=jpg` and `-disable-smallhash` becomes
/// `--disable-smallhash`. Short flags, positionals and everything after a
/// bare `--` are left untouched.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if after_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                after_separator = true;
                return arg;
            }
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LEGACY_LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
