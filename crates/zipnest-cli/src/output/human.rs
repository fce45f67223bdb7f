//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use zipnest_core::RunReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn summary_lines(report: &RunReport) -> Vec<(&'static str, usize)> {
        vec![
            ("Nested archives extracted", report.nested_extracted),
            ("Nested archives failed", report.nested_failed),
            ("Metadata files removed", report.metadata_files_removed),
            ("Metadata dirs removed", report.metadata_dirs_removed),
            ("Directories", report.total_dirs),
            ("Files", report.total_files),
            ("Non-zip files", report.non_zip_files()),
            ("Zip files remaining", report.zip_files),
        ]
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_run_report(&self, report: &RunReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.line(&format!(
                "{} Extraction complete: {}",
                style("✓").green().bold(),
                report.output_dir.display()
            ));
        } else {
            self.line(&format!(
                "Extraction complete: {}",
                report.output_dir.display()
            ));
        }

        if self.verbose {
            self.line(&format!("  Archive: {}", report.archive.display()));
        }

        for (label, value) in Self::summary_lines(report) {
            self.line(&format!(
                "  {:<27}{}",
                format!("{label}:"),
                Self::format_number(value)
            ));
        }

        if self.verbose {
            self.line(&format!("  {:<27}{}", "Scan passes:", report.passes));
            self.line(&format!("  {:<27}{:?}", "Duration:", report.duration));
        }

        if report.used_fallback_dir {
            self.format_warning(
                "Preferred output directory was unavailable; used a timestamped fallback",
            );
        }

        if report.has_failures() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Failed archives:").yellow().bold()));
            } else {
                self.line("Failed archives:");
            }
            for (archive, reason) in report.failures() {
                self.line(&format!("  - {}: {reason}", archive.display()));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            self.line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }
}
