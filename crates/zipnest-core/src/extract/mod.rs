//! Single-archive extraction through an ordered strategy chain.

mod prepare;
mod strategy;

pub use prepare::PreparedDir;
pub use prepare::fallback_path;
pub use prepare::prepare_output_dir;
pub use prepare::reset_dir;
pub use strategy::BuiltinZip;
pub use strategy::ExternalTool;
pub use strategy::ExtractionStrategy;
pub use strategy::ToolArg;
pub use strategy::strategy_for;

use crate::Error;
use crate::Result;
use crate::config::ExtractionTool;
use crate::error::ToolFailure;
use crate::types::ExtractionOutcome;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::warn;

/// Returns `<dir>/<stem>_extracted` for `archive` at `<dir>/<stem>.zip`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::path::PathBuf;
/// use zipnest_core::extract::sibling_output_dir;
///
/// assert_eq!(
///     sibling_output_dir(Path::new("/srv/upload/photos.zip")),
///     PathBuf::from("/srv/upload/photos_extracted"),
/// );
/// ```
#[must_use]
pub fn sibling_output_dir(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map_or_else(|| "archive".into(), |s| s.to_string_lossy());
    archive.with_file_name(format!("{stem}_extracted"))
}

/// Extracts one archive, trying each strategy in order.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use zipnest_core::config::ExtractionTool;
/// use zipnest_core::extract::Extractor;
///
/// # async fn run() -> zipnest_core::Result<()> {
/// let extractor = Extractor::from_tools(&[ExtractionTool::Unzip, ExtractionTool::Ditto]);
/// let outcome = extractor
///     .extract(Path::new("upload/photos.zip"), Path::new("upload/photos_extracted"))
///     .await?;
/// println!("extracted with {} into {}", outcome.tool, outcome.output_dir.display());
/// # Ok(())
/// # }
/// ```
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    /// Creates an extractor from explicit strategies.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Creates an extractor for the configured tools, in order.
    #[must_use]
    pub fn from_tools(tools: &[ExtractionTool]) -> Self {
        Self::new(tools.iter().copied().map(strategy_for).collect())
    }

    /// Names of the strategies, in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extracts `archive` into `preferred_dir` (or its fallback sibling).
    ///
    /// The directory is emptied before the first attempt and again before
    /// every later attempt, so output from a failed tool never mixes with
    /// the final contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryPrep`] if no output directory can be
    /// created, or [`Error::Extraction`] with every tool's diagnostic if
    /// all strategies fail.
    pub async fn extract(&self, archive: &Path, preferred_dir: &Path) -> Result<ExtractionOutcome> {
        let prepared = prepare_output_dir(preferred_dir).await?;
        let mut failures = Vec::new();

        for (attempt, strategy) in self.strategies.iter().enumerate() {
            if attempt > 0
                && let Err(e) = reset_dir(&prepared.path).await
            {
                debug!(dir = %prepared.path.display(), error = %e, "cannot clear partial output");
            }

            match strategy.extract(archive, &prepared.path).await {
                Ok(()) => {
                    debug!(
                        archive = %archive.display(),
                        tool = strategy.name(),
                        "extraction succeeded"
                    );
                    return Ok(ExtractionOutcome {
                        output_dir: prepared.path,
                        tool: strategy.name().to_string(),
                        used_fallback_dir: prepared.is_fallback,
                    });
                }
                Err(diagnostic) => {
                    warn!(
                        archive = %archive.display(),
                        tool = strategy.name(),
                        error = diagnostic.trim(),
                        "extraction tool failed"
                    );
                    failures.push(ToolFailure::new(strategy.name(), diagnostic));
                }
            }
        }

        Err(Error::Extraction {
            archive: archive.to_path_buf(),
            failures,
        })
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
