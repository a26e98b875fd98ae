use super::TransformMode;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Receives a tick after every unit. Purely informational.
pub trait ProgressSink {
    fn start(&mut self, _mode: TransformMode, _total: usize) {}

    fn unit_done(&mut self, processed: usize, total: usize);

    fn finish(&mut self) {}
}

/// Logs one line per processed unit.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn start(&mut self, mode: TransformMode, total: usize) {
        info!("Loading {} {} files", total, mode);
    }

    fn unit_done(&mut self, processed: usize, total: usize) {
        info!("{}/{} files processed.", processed, total);
    }
}

/// Terminal progress bar, for interactive runs.
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, mode: TransformMode, total: usize) {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("  {msg} [{bar:40}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(format!("{} files", mode));
        self.bar = Some(bar);
    }

    fn unit_done(&mut self, processed: usize, _total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(processed as u64);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_position() {
        let mut progress = BarProgress::new();
        progress.start(TransformMode::Song, 3);
        progress.unit_done(2, 3);
        assert_eq!(progress.bar.as_ref().map(|b| b.position()), Some(2));
        progress.finish();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_bar_ignores_ticks_before_start() {
        let mut progress = BarProgress::new();
        progress.unit_done(1, 1);
        progress.finish();
    }
}
