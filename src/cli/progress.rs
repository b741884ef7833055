//! CLI-specific progress handling for butterfly-waystore
//!
//! Provides the progress bar shown while scanning a whole store.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates a progress bar counting ways checked out of `total`
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ways ({percent}%) {per_sec} ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Progress manager for whole-store scans
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; `quiet` hides the bar but keeps counting
    pub fn new(total: u64, message: &str, quiet: bool) -> Self {
        let pb = create_progress_bar(total);
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            eprintln!("{}", message);
        }

        Self { pb }
    }

    /// Record `done` items; redraws are throttled by indicatif
    pub fn update(&self, done: u64) {
        if done % 1000 == 0 || done == self.pb.length().unwrap_or(0) {
            self.pb.set_position(done);
        }
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }
}
