//! End-to-end orchestration of a run.

use crate::Error;
use crate::PipelineConfig;
use crate::Result;
use crate::artifacts;
use crate::cleanup::clean_artifacts;
use crate::extract::Extractor;
use crate::extract::sibling_output_dir;
use crate::nested::NestedExtractionLoop;
use crate::permissions::normalize_permissions;
use crate::report::Phase;
use crate::report::ProgressCallback;
use crate::report::RunReport;
use crate::resolver::PathResolver;
use crate::walker;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Resolves, extracts, recursively unpacks and cleans one archive.
#[derive(Debug)]
pub struct Pipeline {
    resolver: PathResolver,
    extractor: Extractor,
    config: PipelineConfig,
}

impl Pipeline {
    /// Builds a pipeline from `config`, resolving relative paths against
    /// the current working directory.
    ///
    /// # Errors
    ///
    /// Fails if the working directory cannot be determined.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let resolver =
            PathResolver::new(&config.upload_dir)?.max_listed(config.max_listed_candidates);
        let extractor = Extractor::from_tools(&config.tools);
        Ok(Self::with_parts(resolver, extractor, config))
    }

    /// Builds a pipeline from preconfigured parts.
    #[must_use]
    pub fn with_parts(resolver: PathResolver, extractor: Extractor, config: PipelineConfig) -> Self {
        Self {
            resolver,
            extractor,
            config,
        }
    }

    /// Runs the whole pipeline.
    ///
    /// `archive` is the optional lookup argument; `output_dir` overrides
    /// the default `<dir>/<stem>_extracted` destination.
    ///
    /// # Errors
    ///
    /// Fails on resolution errors, on a resolved path without a `.zip`
    /// extension (before anything is written), or when the root archive
    /// cannot be extracted. Nested failures are only counted.
    pub async fn run(
        &self,
        archive: Option<&str>,
        output_dir: Option<&Path>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<RunReport> {
        let result = self.run_inner(archive, output_dir, progress).await;
        progress.on_complete();
        result
    }

    async fn run_inner(
        &self,
        archive: Option<&str>,
        output_dir: Option<&Path>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<RunReport> {
        let started = Instant::now();

        progress.on_phase(Phase::Resolving);
        let archive = self.resolver.resolve(archive).await?;
        if !artifacts::has_zip_extension(&archive) {
            return Err(Error::NotAZip { path: archive });
        }

        let preferred = output_dir.map_or_else(
            || sibling_output_dir(&archive),
            |dir| self.resolver.base_dir().join(dir),
        );
        info!(
            archive = %archive.display(),
            output = %preferred.display(),
            tools = ?self.extractor.strategy_names(),
            "extracting archive"
        );

        progress.on_phase(Phase::ExtractingRoot);
        progress.on_archive_start(&archive);
        let root = self.extractor.extract(&archive, &preferred).await;
        progress.on_archive_complete(&archive, root.is_ok());
        let root = root?;
        let output = root.output_dir;

        normalize_permissions(&output, self.config.dir_mode).await;

        progress.on_phase(Phase::ExtractingNested);
        let mut nested = NestedExtractionLoop::new(&self.extractor, self.config.dir_mode)
            .max_passes(self.config.max_passes);
        let nested = nested.run(&output, progress).await?;

        progress.on_phase(Phase::Cleaning);
        let cleanup = clean_artifacts(&output).await?;

        progress.on_phase(Phase::Counting);
        let listing = walker::walk(&output).await?;
        let zip_files = listing
            .files
            .iter()
            .filter(|path| artifacts::has_zip_extension(path))
            .count();

        let report = RunReport {
            archive,
            output_dir: output,
            used_fallback_dir: root.used_fallback_dir,
            nested_extracted: nested.extracted,
            nested_failed: nested.failed,
            passes: nested.passes,
            metadata_files_removed: cleanup.files_removed,
            metadata_dirs_removed: cleanup.dirs_removed,
            total_files: listing.files.len(),
            total_dirs: listing.dirs.len(),
            zip_files,
            nested: nested.records,
            duration: started.elapsed(),
        };

        info!(
            nested_extracted = report.nested_extracted,
            nested_failed = report.nested_failed,
            files = report.total_files,
            dirs = report.total_dirs,
            "run complete"
        );
        Ok(report)
    }
}
