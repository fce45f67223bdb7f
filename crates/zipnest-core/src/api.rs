//! High-level entry point.

use crate::PipelineConfig;
use crate::Result;
use crate::pipeline::Pipeline;
use crate::report::NoopProgress;
use crate::report::RunReport;
use std::path::Path;

/// Resolves, extracts and normalizes an archive with `config`.
///
/// This is the main high-level API. `archive` is the optional lookup
/// argument (path, file name or basename); `output_dir` overrides the
/// default `<dir>/<stem>_extracted` destination.
///
/// # Errors
///
/// Returns an error if:
/// - No archive can be resolved
/// - The resolved file is not a `.zip`
/// - The root archive cannot be extracted by any configured tool
///
/// # Examples
///
/// ```no_run
/// use zipnest_core::PipelineConfig;
/// use zipnest_core::run_pipeline;
///
/// # async fn run() -> zipnest_core::Result<()> {
/// let report = run_pipeline(&PipelineConfig::default(), Some("photos"), None).await?;
/// println!(
///     "{} nested archives extracted, {} failed",
///     report.nested_extracted, report.nested_failed
/// );
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(
    config: &PipelineConfig,
    archive: Option<&str>,
    output_dir: Option<&Path>,
) -> Result<RunReport> {
    let pipeline = Pipeline::new(config.clone())?;
    pipeline.run(archive, output_dir, &mut NoopProgress).await
}
