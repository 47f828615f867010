//! Progress reporting utilities using indicatif.
//!
//! The finder reports scan events through the [`ScanObserver`] trait.
//! [`Progress`] implements it as a terminal spinner counting the archives
//! scanned so far.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::comment::ArchiveComment;
use crate::scanner::ArchiveEntry;
use crate::session::ScanSummary;

/// Receiver of scan events.
///
/// Every method has an empty default, so implementors pick the events they
/// care about. Methods are called from the scanning thread, in walk order.
pub trait ScanObserver: Send + Sync {
    /// A root is about to be walked.
    fn on_root(&self, _root: &Path) {}

    /// An archive was visited. `seen` counts it.
    fn on_archive(&self, _archive: &ArchiveEntry, _seen: u64) {}

    /// A comment was accepted.
    fn on_comment(&self, _comment: &ArchiveComment) {}

    /// A comment was written to `path`.
    fn on_saved(&self, _path: &Path) {}

    /// An export was skipped because `path` already exists.
    fn on_skipped(&self, _path: &Path, _size: u64) {}

    /// A recoverable error occurred.
    fn on_error(&self, _error: &dyn std::error::Error) {}

    /// The scan ended.
    fn on_finish(&self, _summary: &ScanSummary) {}
}

/// Spinner showing the number of archives scanned.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a spinner. A `hidden` spinner draws nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipcmt::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_hidden());
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        if hidden {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} Scanned {pos} zip archives [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Returns true if nothing is drawn.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Run `f` with the spinner cleared from the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Remove the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for Progress {
    fn on_archive(&self, archive: &ArchiveEntry, seen: u64) {
        self.bar.set_position(seen);
        self.bar
            .set_message(truncate_path(&archive.path.to_string_lossy(), 40));
    }

    fn on_finish(&self, _summary: &ScanSummary) {
        self.finish();
    }
}

/// Truncate a path for display next to the spinner.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let len = file_name.chars().count();
    if len + 4 > max_len {
        let tail: String = file_name.chars().skip(len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
