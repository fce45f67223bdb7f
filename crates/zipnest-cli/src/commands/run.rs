//! Run command implementation.

use crate::cli::Cli;
use crate::error::add_run_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use zipnest_core::NoopProgress;
use zipnest_core::Pipeline;
use zipnest_core::PipelineConfig;
use zipnest_core::config::ExtractionTool;
use zipnest_core::extract::ExternalTool;

pub async fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut config = PipelineConfig {
        upload_dir: cli.upload_dir.clone(),
        max_passes: cli.max_passes(),
        ..Default::default()
    };
    if let Some(tools) = cli.extraction_tools() {
        config.tools = tools;
    }

    if !any_tool_available(&config.tools) {
        formatter.format_warning(&format!(
            "none of the configured tools ({}) is on PATH; try --tool builtin",
            config
                .tools
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let pipeline = Pipeline::new(config).context("failed to get current directory")?;
    let zip = cli.zip.as_deref();
    let output = cli.output.as_deref();

    // Use a spinner if TTY is detected (not quiet, not JSON, is terminal)
    let report = if !cli.quiet && !cli.json && CliProgress::should_show() {
        let mut progress = CliProgress::new();
        add_run_context(pipeline.run(zip, output, &mut progress).await)?
    } else {
        let mut noop = NoopProgress;
        add_run_context(pipeline.run(zip, output, &mut noop).await)?
    };

    formatter.format_run_report(&report)?;

    Ok(())
}

fn any_tool_available(tools: &[ExtractionTool]) -> bool {
    tools.iter().any(|tool| match tool {
        ExtractionTool::Unzip => ExternalTool::unzip().is_available(),
        ExtractionTool::Ditto => ExternalTool::ditto().is_available(),
        ExtractionTool::Builtin => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_always_available() {
        assert!(any_tool_available(&[ExtractionTool::Builtin]));
        assert!(!any_tool_available(&[]));
    }
}
