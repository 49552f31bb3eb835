//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size bucketing**: Group files by size (see [`crate::duplicates::groups`] module)
//! 2. **Phase 2 - Partial hash**: Hash a 2KB window of same-size files (optional)
//! 3. **Phase 3 - Full hash**: Hash entire content of the remaining candidates
//!
//! Every phase drains its input before the next one starts, and all state
//! lives in the values passed between phases. Nothing is global.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let report = finder.find_duplicates(&[PathBuf::from("/some/path")]).unwrap();
//!
//! println!("{}", report.totals.summary_line(report.elapsed));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::progress::{NoProgress, ProgressCallback, PHASE_FULL, PHASE_PARTIAL, PHASE_WALKING};
use crate::scanner::{
    CandidateFile, Digested, FileOutcome, Fingerprint, HashError, Hasher, ScanError, SkipReason,
    Walker, WalkerConfig, PARTIAL_WINDOW,
};

use super::groups::{DuplicateGroups, Placement, SizeBuckets};

/// Threshold for logging large files.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100MB

/// Configuration for the duplicate finder.
///
/// The default walks with [`WalkerConfig::default`], which scans the same
/// extension list as the command line does without `--ext`.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Run the partial fingerprint filter before the full pass.
    pub partial_hash: bool,
    /// Partial fingerprint window in bytes.
    pub partial_window: u64,
    /// Compare byte-for-byte with the canonical member before accepting a digest match.
    pub verify: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            partial_hash: true,
            partial_window: PARTIAL_WINDOW,
            verify: false,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Enable or disable the partial fingerprint filter.
    #[must_use]
    pub fn with_partial_hash(mut self, enabled: bool) -> Self {
        self.partial_hash = enabled;
        self
    }

    /// Set the partial fingerprint window (minimum 1 byte).
    #[must_use]
    pub fn with_partial_window(mut self, window: u64) -> Self {
        self.partial_window = window.max(1);
        self
    }

    /// Enable byte-by-byte verification of digest matches.
    #[must_use]
    pub fn with_verify(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }
}

/// Running totals of one scan.
///
/// Pure bookkeeping for the final summary; no decision reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTotals {
    /// Files accepted by the enumerator
    pub files_seen: usize,
    /// Files sharing a non-zero size with another file
    pub same_size_candidates: usize,
    /// Candidates left after the partial filter (equals candidates when skipped)
    pub partial_survivors: usize,
    /// Files belonging to a group of two or more, canonical members included
    pub duplicate_files: usize,
    /// Groups of two or more
    pub duplicate_groups: usize,
    /// Files skipped because they could not be opened or stat'ed
    pub skipped_files: usize,
}

impl ScanTotals {
    /// Number of files that removal would delete.
    #[must_use]
    pub fn redundant(&self) -> usize {
        self.duplicate_files - self.duplicate_groups
    }

    /// Account for a file joining a group that now has `group_len` members.
    pub fn record_join(&mut self, group_len: usize) {
        if group_len == 2 {
            self.duplicate_files += 2;
            self.duplicate_groups += 1;
        } else {
            self.duplicate_files += 1;
        }
    }

    /// The closing summary line.
    #[must_use]
    pub fn summary_line(&self, elapsed: Duration) -> String {
        format!(
            "Finish, {} group files has {} copies, {} will be deleted, time consuming: {:?}.",
            self.duplicate_groups,
            self.duplicate_files,
            self.redundant(),
            elapsed
        )
    }
}

/// Everything a scan produced.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Full-content groups, including single-member ones
    pub groups: DuplicateGroups,
    /// Running totals
    pub totals: ScanTotals,
    /// Files left out of fingerprinting, with the reason
    pub skipped: Vec<SkipReason>,
    /// Non-fatal traversal errors
    pub scan_errors: Vec<ScanError>,
    /// Wall time of the scan
    pub elapsed: Duration,
}

impl ScanReport {
    /// Groups with two or more members, in ascending canonical path order.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &super::DuplicateGroup> {
        self.groups.duplicates()
    }

    /// Record a skipped file.
    fn skip(&mut self, reason: SkipReason) {
        log::warn!("{}", reason);
        self.totals.skipped_files += 1;
        self.skipped.push(reason);
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A root could not be traversed.
    #[error(transparent)]
    Traversal(ScanError),

    /// A file failed partway through hashing.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Duplicate finder that orchestrates the multi-phase detection pipeline.
///
/// The `DuplicateFinder` runs the complete duplicate detection pipeline:
/// 1. **Walk** - Collect all files from the roots and bucket them by size
/// 2. **Partial** - Compare a window of same-size files (optional)
/// 3. **Full** - Compute full hashes to confirm duplicates
///
/// # Example
///
/// ```no_run
/// use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let config = FinderConfig::default().with_partial_hash(false);
/// let finder = DuplicateFinder::new(config);
///
/// let report = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
/// println!("Found {} duplicate groups", report.totals.duplicate_groups);
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
    progress: Box<dyn ProgressCallback>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
            progress: Box::new(NoProgress),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Set the progress observer.
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the hasher (e.g. to use a different buffer size).
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files under the given roots.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - A root does not exist or is not a directory
    /// - A root cannot be traversed
    /// - A file fails partway through hashing
    pub fn find_duplicates(&self, roots: &[PathBuf]) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        let mut report = ScanReport::default();

        let roots = prepare_roots(roots)?;

        log::info!("Step 1: Scanning possibly duplicate files...");
        let buckets = self.collect_sizes(&roots, &mut report)?;

        let mut candidates = buckets.into_candidates();
        report.totals.same_size_candidates = candidates.len();
        log::info!(
            "{} / {} files share their size with another file",
            candidates.len(),
            report.totals.files_seen
        );

        if self.config.partial_hash {
            candidates = self.partial_filter(candidates, &mut report)?;
        }
        report.totals.partial_survivors = candidates.len();
        log::info!(
            "{} / {} files are possibly duplicate.",
            candidates.len(),
            report.totals.files_seen
        );

        log::info!("Step 2: Checking file content...");
        report.groups = self.full_hash(candidates, &mut report)?;

        report.elapsed = start_time.elapsed();
        log::info!(
            "Scan complete: {} groups, {} duplicates in {:?}",
            report.totals.duplicate_groups,
            report.totals.duplicate_files,
            report.elapsed
        );

        Ok(report)
    }

    /// Walk every root and bucket the accepted files by size (Phase 1).
    ///
    /// Per-entry traversal errors are recorded in the report and the walk
    /// continues. An error at a root aborts.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Traversal`] if a root cannot be read.
    pub fn collect_sizes(
        &self,
        roots: &[PathBuf],
        report: &mut ScanReport,
    ) -> Result<SizeBuckets, FinderError> {
        let mut buckets = SizeBuckets::new();
        self.progress.on_phase_start(PHASE_WALKING, 0);

        for root in roots {
            log::debug!("Walking {}", root.display());
            let walker = Walker::new(root, self.config.walker_config.clone());

            for result in walker.walk() {
                match result {
                    Ok(file) => {
                        report.totals.files_seen += 1;
                        self.progress
                            .on_progress(report.totals.files_seen, &file.path);
                        buckets.add(file);
                    }
                    Err(e) if e.is_fatal() => {
                        self.progress.on_phase_end(PHASE_WALKING);
                        return Err(FinderError::Traversal(e));
                    }
                    Err(e) => report.scan_errors.push(e),
                }
            }
        }

        self.progress.on_phase_end(PHASE_WALKING);
        log::debug!(
            "Phase 1: {} files in {} size buckets",
            buckets.file_count(),
            buckets.bucket_count()
        );
        Ok(buckets)
    }

    /// Drop candidates whose window fingerprint is unique (Phase 2).
    ///
    /// Files that differ inside the window cannot be duplicates, so no true
    /// duplicate is lost. Files that match here may still differ elsewhere;
    /// the full pass decides. The returned list is sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Hash`] if a file fails partway through reading.
    pub fn partial_filter(
        &self,
        candidates: Vec<CandidateFile>,
        report: &mut ScanReport,
    ) -> Result<Vec<CandidateFile>, FinderError> {
        if candidates.is_empty() {
            log::debug!("Phase 2: No files to process");
            return Ok(candidates);
        }

        let total = candidates.len();
        self.progress.on_phase_start(PHASE_PARTIAL, total);
        log::info!("Phase 2: Computing partial hashes for {} files", total);

        let mut windows: HashMap<Fingerprint, Vec<CandidateFile>> = HashMap::new();
        for (idx, file) in candidates.into_iter().enumerate() {
            self.progress.on_progress(idx + 1, &file.path);

            match self.hasher.partial_hash(&file.path, self.config.partial_window)? {
                FileOutcome::Processed(digested) => {
                    windows.entry(digested.fingerprint).or_default().push(file);
                }
                FileOutcome::Skipped(reason) => report.skip(reason),
            }
        }

        let mut survivors: Vec<CandidateFile> = windows
            .into_values()
            .filter(|files| files.len() > 1)
            .flatten()
            .collect();
        survivors.sort_by(|a, b| a.path.cmp(&b.path));

        self.progress.on_phase_end(PHASE_PARTIAL);
        log::info!(
            "Phase 2 complete: {} of {} files remain",
            survivors.len(),
            total
        );

        Ok(survivors)
    }

    /// Group candidates by full-content fingerprint (Phase 3).
    ///
    /// Candidates are processed in the order given, which must be ascending
    /// path order for the canonical member of each group to be stable.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Hash`] if a file fails partway through reading.
    pub fn full_hash(
        &self,
        candidates: Vec<CandidateFile>,
        report: &mut ScanReport,
    ) -> Result<DuplicateGroups, FinderError> {
        let mut groups = DuplicateGroups::new();
        if candidates.is_empty() {
            log::debug!("Phase 3: No files to process");
            return Ok(groups);
        }

        let total = candidates.len();
        self.progress.on_phase_start(PHASE_FULL, total);
        log::info!("Phase 3: Computing full hashes for {} files", total);

        for (idx, file) in candidates.into_iter().enumerate() {
            let current = idx + 1;
            self.progress.on_progress(current, &file.path);

            if file.size > LARGE_FILE_THRESHOLD {
                log::debug!(
                    "Hashing large file ({} MB): {}",
                    file.size / (1024 * 1024),
                    file.path.display()
                );
            }

            let Digested { fingerprint, size } = match self.hasher.full_hash(&file.path)? {
                FileOutcome::Processed(digested) => digested,
                FileOutcome::Skipped(reason) => {
                    report.skip(reason);
                    continue;
                }
            };

            if self.config.verify {
                if let Some(group) = groups.get(&fingerprint) {
                    if !self.verify_match(group.canonical(), &file.path, report)? {
                        continue;
                    }
                }
            }

            match groups.insert(fingerprint, size, file.path) {
                Placement::Founded => {}
                Placement::Joined(group) => {
                    let path = group.members()[group.len() - 1].as_path();
                    self.progress
                        .on_duplicate(current, total, path, group.canonical());
                    report.totals.record_join(group.len());
                }
            }
        }

        self.progress.on_phase_end(PHASE_FULL);
        log::info!(
            "Phase 3 complete: {} groups, {} duplicates",
            report.totals.duplicate_groups,
            report.totals.duplicate_files
        );

        Ok(groups)
    }

    /// Byte-compare a digest match against the canonical member.
    fn verify_match(
        &self,
        canonical: &Path,
        path: &Path,
        report: &mut ScanReport,
    ) -> Result<bool, FinderError> {
        match self.hasher.contents_equal(canonical, path)? {
            FileOutcome::Processed(true) => Ok(true),
            FileOutcome::Processed(false) => {
                log::error!(
                    "Digest collision: {} matches {} by hash but not by content",
                    path.display(),
                    canonical.display()
                );
                Ok(false)
            }
            FileOutcome::Skipped(reason) => {
                report.skip(reason);
                Ok(false)
            }
        }
    }
}

/// Validate roots and drop any root nested inside another.
///
/// Roots are canonicalized so that one directory given twice, or reached
/// through two spellings, is walked once.
fn prepare_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>, FinderError> {
    let mut prepared = Vec::with_capacity(roots.len());
    for root in roots {
        if !root.exists() {
            return Err(FinderError::PathNotFound(root.clone()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.clone()));
        }
        let canonical = root.canonicalize().map_err(|source| {
            FinderError::Traversal(ScanError::RootUnreadable {
                path: root.clone(),
                source,
            })
        })?;
        prepared.push(canonical);
    }

    prepared.sort();
    let mut kept: Vec<PathBuf> = Vec::with_capacity(prepared.len());
    for root in prepared {
        if let Some(outer) = kept.iter().find(|k| root.starts_with(k)) {
            log::warn!(
                "Skipping root {} (already covered by {})",
                root.display(),
                outer.display()
            );
            continue;
        }
        kept.push(root);
    }
    Ok(kept)
}
