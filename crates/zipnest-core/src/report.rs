//! Run reporting and progress callbacks.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Result of one nested archive extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedResult {
    /// Extracted into the given directory.
    Extracted(PathBuf),
    /// Every tool failed; carries the combined diagnostic.
    Failed(String),
}

/// One nested archive the loop submitted to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedRecord {
    /// The nested archive.
    pub archive: PathBuf,
    /// Scan pass (1-based) in which it was found.
    pub pass: usize,
    /// What happened.
    pub result: NestedResult,
}

/// Aggregate statistics of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// The root archive that was processed.
    pub archive: PathBuf,

    /// Directory holding the extracted tree.
    pub output_dir: PathBuf,

    /// `true` if the root output had to use the timestamped fallback.
    pub used_fallback_dir: bool,

    /// Nested archives extracted successfully.
    pub nested_extracted: usize,

    /// Nested archives that could not be extracted.
    pub nested_failed: usize,

    /// Scan passes run by the nested loop, including the final empty one.
    pub passes: usize,

    /// Metadata files removed during cleanup.
    pub metadata_files_removed: usize,

    /// Metadata directories removed during cleanup.
    pub metadata_dirs_removed: usize,

    /// Files in the final tree.
    pub total_files: usize,

    /// Directories in the final tree, excluding the output root.
    pub total_dirs: usize,

    /// Files in the final tree that are zip archives.
    pub zip_files: usize,

    /// Per-archive details of the nested loop.
    pub nested: Vec<NestedRecord>,

    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl RunReport {
    /// Files in the final tree that are not zip archives.
    #[must_use]
    pub fn non_zip_files(&self) -> usize {
        self.total_files.saturating_sub(self.zip_files)
    }

    /// Returns `true` if any nested archive failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.nested_failed > 0
    }

    /// Iterates over the nested archives that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.nested.iter().filter_map(|record| match &record.result {
            NestedResult::Failed(reason) => Some((record.archive.as_path(), reason.as_str())),
            NestedResult::Extracted(_) => None,
        })
    }
}

/// Stage of the pipeline, reported through [`ProgressCallback::on_phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Locating the root archive.
    Resolving,
    /// Extracting the root archive.
    ExtractingRoot,
    /// Scanning for and extracting nested archives.
    ExtractingNested,
    /// Removing metadata artifacts.
    Cleaning,
    /// Counting the final tree.
    Counting,
}

impl Phase {
    /// Short human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resolving => "Resolving archive",
            Self::ExtractingRoot => "Extracting",
            Self::ExtractingNested => "Extracting nested",
            Self::Cleaning => "Cleaning",
            Self::Counting => "Counting",
        }
    }
}

/// Callback trait for progress reporting during a run.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipnest_core::ProgressCallback;
/// use zipnest_core::report::Phase;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_phase(&mut self, phase: Phase) {
///         println!("{}", phase.label());
///     }
///
///     fn on_archive_start(&mut self, archive: &Path) {
///         println!("extracting {}", archive.display());
///     }
///
///     fn on_archive_complete(&mut self, _archive: &Path, success: bool) {
///         println!("success: {success}");
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when the pipeline enters a new phase.
    fn on_phase(&mut self, phase: Phase);

    /// Called before an archive (root or nested) is extracted.
    fn on_archive_start(&mut self, archive: &Path);

    /// Called after an extraction attempt finished.
    fn on_archive_complete(&mut self, archive: &Path, success: bool);

    /// Called once the run finished, successfully or not.
    fn on_complete(&mut self);
}

/// No-op implementation of [`ProgressCallback`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_phase(&mut self, _phase: Phase) {}

    fn on_archive_start(&mut self, _archive: &Path) {}

    fn on_archive_complete(&mut self, _archive: &Path, _success: bool) {}

    fn on_complete(&mut self) {}
}
