//! Console progress for reading large data blocks

use indicatif::{ProgressBar, ProgressStyle};

/// Row counter drawn as a progress bar on stderr
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Create a tracker for `total` rows
    ///
    /// # Arguments
    /// * `total` - Number of rows that will be reported
    /// * `description` - Label shown next to the bar
    /// * `visible` - Draw the bar; a hidden tracker still counts
    pub fn new(total: u64, description: &str, visible: bool) -> Self {
        let bar = if visible { ProgressBar::new(total) } else { ProgressBar::hidden() };

        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// Record rows as done
    pub fn increment(&self, rows: u64) {
        self.bar.inc(rows);
    }

    /// Number of rows recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
