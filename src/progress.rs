//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`ProgressCallback`] observer trait and the
//! [`Progress`] struct which renders it as terminal progress bars. Observers
//! only receive notifications; nothing they do feeds back into the pipeline.

use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Phase name for directory enumeration.
pub const PHASE_WALKING: &str = "walking";
/// Phase name for the partial fingerprint filter.
pub const PHASE_PARTIAL: &str = "partial";
/// Phase name for the full fingerprint pass.
pub const PHASE_FULL: &str = "full";

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "partial", "full")
    /// * `total` - Total number of items to process (0 when unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &Path);

    /// Called when the full pass finds a file matching an earlier one.
    ///
    /// # Arguments
    ///
    /// * `current` - Position of `path` in the full pass (1-based)
    /// * `total` - Number of files in the full pass
    /// * `path` - The newly matched file
    /// * `canonical` - The group's canonical member
    fn on_duplicate(&self, _current: usize, _total: usize, _path: &Path, _canonical: &Path) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}
    fn on_progress(&self, _current: usize, _path: &Path) {}
    fn on_phase_end(&self, _phase: &str) {}
}

/// Format the line announcing a newly found duplicate.
#[must_use]
pub fn duplicate_line(current: usize, total: usize, path: &Path, canonical: &Path) -> String {
    format!(
        "[{} / {}] {} is a duplicate of {}",
        current,
        total,
        path.display(),
        canonical.display()
    )
}

/// Progress reporter using indicatif.
///
/// Draws one bar per phase on stdout. Duplicate announcements are printed
/// above the active bar, or directly to stdout when bars are disabled.
pub struct Progress {
    multi: MultiProgress,
    walking: RefCell<Option<ProgressBar>>,
    partial: RefCell<Option<ProgressBar>>,
    full: RefCell<Option<ProgressBar>>,
    bars: bool,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `bars` - Draw progress bars.
    /// * `quiet` - Print nothing at all, not even duplicate announcements.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupsweep::progress::Progress;
    ///
    /// let progress = Progress::new(false, false);
    /// ```
    #[must_use]
    pub fn new(bars: bool, quiet: bool) -> Self {
        let bars = bars && !quiet;
        let target = if bars {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            walking: RefCell::new(None),
            partial: RefCell::new(None),
            full: RefCell::new(None),
            bars,
            quiet,
        }
    }

    fn slot(&self, phase: &str) -> Option<&RefCell<Option<ProgressBar>>> {
        match phase {
            PHASE_WALKING => Some(&self.walking),
            PHASE_PARTIAL => Some(&self.partial),
            PHASE_FULL => Some(&self.full),
            _ => None,
        }
    }

    /// The bar of the latest phase still running.
    fn active(&self) -> Option<ProgressBar> {
        [&self.full, &self.partial, &self.walking]
            .into_iter()
            .find_map(|slot| slot.borrow().clone())
    }

    /// Create a style for the walking phase (spinner).
    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Create a style for the hashing phases (progress bar).
    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if !self.bars {
            return;
        }

        let pb = if phase == PHASE_WALKING {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::walking_style());
            pb.set_message("Scanning possibly duplicate files");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = self.multi.add(ProgressBar::new(total as u64));
            pb.set_style(Self::hashing_style());
            pb.set_message(match phase {
                PHASE_PARTIAL => "Partial hashing",
                PHASE_FULL => "Checking file content",
                other => other,
            }
            .to_string());
            pb
        };

        if let Some(slot) = self.slot(phase) {
            *slot.borrow_mut() = Some(pb);
        }
    }

    fn on_progress(&self, current: usize, path: &Path) {
        if let Some(pb) = self.active() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(&path.to_string_lossy(), 30));
        }
    }

    fn on_duplicate(&self, current: usize, total: usize, path: &Path, canonical: &Path) {
        if self.quiet {
            return;
        }

        let line = duplicate_line(current, total, path, canonical);
        if self.bars {
            if self.multi.println(&line).is_err() {
                println!("{line}");
            }
        } else {
            println!("{line}");
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if let Some(pb) = self.slot(phase).and_then(|slot| slot.borrow_mut().take()) {
            pb.finish_with_message(format!("{phase} complete"));
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
