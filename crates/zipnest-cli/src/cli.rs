//! CLI argument parsing using clap.

use clap::Parser;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;
use zipnest_core::config::ExtractionTool;

#[derive(Parser)]
#[command(name = "zipnest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Archive to process: a path, a file name in the upload directory, or
    /// a base name with or without `.zip` (default: newest upload)
    #[arg(value_name = "ZIP")]
    pub zip: Option<String>,

    /// Output directory (default: `<zip dir>/<zip stem>_extracted`)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory searched for uploaded archives
    #[arg(long, value_name = "DIR", default_value = "upload")]
    pub upload_dir: PathBuf,

    /// Extraction tool to try, in order (can be repeated; default: unzip, ditto)
    #[arg(long = "tool", value_name = "TOOL", value_enum)]
    pub tools: Vec<ToolChoice>,

    /// Stop nested extraction after this many scan passes
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_passes: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Tools selected on the command line, if any.
    pub fn extraction_tools(&self) -> Option<Vec<ExtractionTool>> {
        (!self.tools.is_empty()).then(|| self.tools.iter().copied().map(Into::into).collect())
    }

    /// Pass limit for the nested loop.
    pub fn max_passes(&self) -> Option<usize> {
        self.max_passes
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToolChoice {
    /// Info-ZIP `unzip`
    Unzip,
    /// macOS `ditto`
    Ditto,
    /// In-process zip reader
    Builtin,
}

impl From<ToolChoice> for ExtractionTool {
    fn from(choice: ToolChoice) -> Self {
        match choice {
            ToolChoice::Unzip => Self::Unzip,
            ToolChoice::Ditto => Self::Ditto,
            ToolChoice::Builtin => Self::Builtin,
        }
    }
}
