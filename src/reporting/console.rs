//! Terminal progress sink

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::progress::ProgressSink;

/// Renders export progress as a 0-100 bar and status lines above it.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    /// A visible bar, or a hidden one for batch runs.
    pub fn new(batch: bool) -> Self {
        let bar = if batch {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        };
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn progress(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    fn status(&self, message: &str) {
        if self.bar.is_hidden() {
            println!("{message}");
        } else {
            self.bar.println(message);
        }
    }
}
