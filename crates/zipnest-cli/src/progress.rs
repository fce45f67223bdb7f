//! Spinner implementation for CLI runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use zipnest_core::ProgressCallback;
use zipnest_core::report::Phase;

/// CLI spinner implementing `ProgressCallback`.
///
/// Shows the current phase or the archive being extracted, with running
/// counts of extracted and failed archives. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    extracted: usize,
    failed: usize,
}

impl CliProgress {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ [3 ok, 1 failed] Extracting photos.zip (2s)"
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{prefix}] {wide_msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        let progress = Self {
            bar,
            extracted: 0,
            failed: 0,
        };
        progress.update_prefix();
        progress
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn update_prefix(&self) {
        self.bar
            .set_prefix(format!("{} ok, {} failed", self.extracted, self.failed));
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_phase(&mut self, phase: Phase) {
        self.bar.set_message(phase.label());
    }

    fn on_archive_start(&mut self, archive: &Path) {
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar.set_message(format!("Extracting {name}"));
    }

    fn on_archive_complete(&mut self, _archive: &Path, success: bool) {
        if success {
            self.extracted += 1;
        } else {
            self.failed += 1;
        }
        self.update_prefix();
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_callback_counts() {
        let mut progress = CliProgress::new();

        progress.on_phase(Phase::ExtractingNested);
        progress.on_archive_start(Path::new("/out/a.zip"));
        progress.on_archive_complete(Path::new("/out/a.zip"), true);
        progress.on_archive_start(Path::new("/out/b.zip"));
        progress.on_archive_complete(Path::new("/out/b.zip"), false);
        progress.on_complete();

        assert_eq!(progress.extracted, 1);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.bar.prefix(), "1 ok, 1 failed");
    }
}
