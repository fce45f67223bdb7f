//! Zipnest CLI - Command-line utility for recursive zip extraction and
//! cleanup.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.completions {
        commands::completion::execute(shell);
        return Ok(());
    }

    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    if let Err(err) = commands::run::execute(&cli, &*formatter).await {
        formatter.format_error(&err);
        std::process::exit(1);
    }
    Ok(())
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "zipnest=debug,zipnest_core=debug"
    } else if quiet {
        "zipnest=warn,zipnest_core=warn"
    } else {
        "zipnest=info,zipnest_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
