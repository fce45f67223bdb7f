//! Fixpoint loop over zips discovered inside an extracted tree.
//!
//! Every pass normalizes permissions, rescans the whole tree and extracts
//! each real zip not seen before into a sibling `<stem>_extracted`
//! directory. A path is claimed before its extraction starts, so it is
//! never submitted twice, whether or not the attempt succeeds.

use crate::Result;
use crate::artifacts;
use crate::extract::Extractor;
use crate::extract::sibling_output_dir;
use crate::permissions::normalize_permissions;
use crate::report::NestedRecord;
use crate::report::NestedResult;
use crate::report::ProgressCallback;
use crate::types::ProcessedSet;
use crate::walker;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Totals produced by [`NestedExtractionLoop::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedSummary {
    /// Nested archives extracted.
    pub extracted: usize,
    /// Nested archives whose extraction failed.
    pub failed: usize,
    /// Scan passes run, including the final one that found nothing.
    pub passes: usize,
    /// One record per archive submitted, in submission order.
    pub records: Vec<NestedRecord>,
}

/// Drives the extractor over nested zips until no new ones appear.
#[derive(Debug)]
pub struct NestedExtractionLoop<'a> {
    extractor: &'a Extractor,
    dir_mode: u32,
    max_passes: Option<usize>,
    processed: ProcessedSet,
}

impl<'a> NestedExtractionLoop<'a> {
    /// Creates a loop using `extractor`, applying `dir_mode` to
    /// directories before every scan.
    #[must_use]
    pub fn new(extractor: &'a Extractor, dir_mode: u32) -> Self {
        Self {
            extractor,
            dir_mode,
            max_passes: None,
            processed: ProcessedSet::new(),
        }
    }

    /// Stops after `max_passes` scans even if new zips keep appearing.
    #[must_use]
    pub fn max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Archives submitted so far.
    #[must_use]
    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// Runs to fixpoint (or the pass limit) under `root`.
    ///
    /// # Errors
    ///
    /// Fails only if `root` cannot be listed. Per-archive failures are
    /// counted in the summary.
    pub async fn run(
        &mut self,
        root: &Path,
        progress: &mut dyn ProgressCallback,
    ) -> Result<NestedSummary> {
        let mut summary = NestedSummary::default();

        loop {
            if let Some(max) = self.max_passes
                && summary.passes >= max
            {
                warn!(passes = max, "pass limit reached; remaining nested archives left as-is");
                break;
            }
            summary.passes += 1;

            normalize_permissions(root, self.dir_mode).await;

            let pending = self.pending(root).await?;
            if pending.is_empty() {
                debug!(passes = summary.passes, "no new nested archives");
                break;
            }
            debug!(pass = summary.passes, count = pending.len(), "nested archives found");

            for archive in pending {
                if !self.processed.claim(&archive) {
                    continue;
                }
                progress.on_archive_start(&archive);

                let target = sibling_output_dir(&archive);
                let result = match self.extractor.extract(&archive, &target).await {
                    Ok(outcome) => {
                        summary.extracted += 1;
                        info!(
                            from = %archive.display(),
                            to = %outcome.output_dir.display(),
                            tool = %outcome.tool,
                            "extracted nested archive"
                        );
                        NestedResult::Extracted(outcome.output_dir)
                    }
                    Err(e) => {
                        summary.failed += 1;
                        warn!(archive = %archive.display(), error = %e, "nested extraction failed");
                        NestedResult::Failed(e.to_string())
                    }
                };

                let success = matches!(result, NestedResult::Extracted(_));
                progress.on_archive_complete(&archive, success);
                summary.records.push(NestedRecord {
                    archive,
                    pass: summary.passes,
                    result,
                });
            }
        }

        Ok(summary)
    }

    async fn pending(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut pending: Vec<PathBuf> = walker::list_files(root)
            .await?
            .into_iter()
            .filter(|path| artifacts::is_real_zip(path, root) && !self.processed.contains(path))
            .collect();
        pending.sort();
        Ok(pending)
    }
}
