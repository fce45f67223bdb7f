//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use zipnest_core::RunReport;

const OPERATION: &str = "extract";

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct FailureOutput {
    archive: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    archive: String,
    output_dir: String,
    used_fallback_dir: bool,
    nested_extracted: usize,
    nested_failed: usize,
    passes: usize,
    metadata_files_removed: usize,
    metadata_dirs_removed: usize,
    total_dirs: usize,
    total_files: usize,
    non_zip_files: usize,
    zip_files: usize,
    failures: Vec<FailureOutput>,
    duration_ms: u128,
}

impl From<&RunReport> for RunOutput {
    fn from(report: &RunReport) -> Self {
        Self {
            archive: report.archive.display().to_string(),
            output_dir: report.output_dir.display().to_string(),
            used_fallback_dir: report.used_fallback_dir,
            nested_extracted: report.nested_extracted,
            nested_failed: report.nested_failed,
            passes: report.passes,
            metadata_files_removed: report.metadata_files_removed,
            metadata_dirs_removed: report.metadata_dirs_removed,
            total_dirs: report.total_dirs,
            total_files: report.total_files,
            non_zip_files: report.non_zip_files(),
            zip_files: report.zip_files,
            failures: report
                .failures()
                .map(|(archive, reason)| FailureOutput {
                    archive: archive.display().to_string(),
                    reason: reason.to_string(),
                })
                .collect(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_run_report(&self, report: &RunReport) -> Result<()> {
        Self::output(&JsonOutput::success(OPERATION, RunOutput::from(report)))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error(OPERATION, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    // Stdout carries exactly one JSON document, so warnings go to the log.
    fn format_warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
