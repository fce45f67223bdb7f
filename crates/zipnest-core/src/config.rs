//! Pipeline configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// An extraction tool that can take part in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionTool {
    /// Info-ZIP `unzip`, run under a neutral locale.
    Unzip,
    /// macOS `ditto -x -k`.
    Ditto,
    /// In-process extraction with the `zip` crate.
    Builtin,
}

impl ExtractionTool {
    /// Returns the name used in logs and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unzip => "unzip",
            Self::Ditto => "ditto",
            Self::Builtin => "builtin",
        }
    }
}

impl fmt::Display for ExtractionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractionTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unzip" => Ok(Self::Unzip),
            "ditto" => Ok(Self::Ditto),
            "builtin" => Ok(Self::Builtin),
            other => Err(format!("unknown extraction tool: {other}")),
        }
    }
}

/// Configuration for a pipeline run.
///
/// # Examples
///
/// ```
/// use zipnest_core::PipelineConfig;
/// use zipnest_core::config::ExtractionTool;
///
/// let config = PipelineConfig {
///     upload_dir: "/srv/incoming".into(),
///     tools: vec![ExtractionTool::Builtin],
///     ..Default::default()
/// };
/// assert_eq!(config.max_listed_candidates, 12);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory searched for archives. Relative paths are resolved
    /// against the working directory when the resolver is built.
    pub upload_dir: PathBuf,

    /// Extraction tools, tried in order until one succeeds.
    pub tools: Vec<ExtractionTool>,

    /// Mode applied to every directory of the extracted tree.
    pub dir_mode: u32,

    /// How many available archive names a failed lookup reports.
    pub max_listed_candidates: usize,

    /// Upper bound on nested scan passes (`None` = run to fixpoint).
    pub max_passes: Option<usize>,
}

impl Default for PipelineConfig {
    /// Default values:
    /// - `upload_dir`: `upload`
    /// - `tools`: `[unzip, ditto]`
    /// - `dir_mode`: `0o755`
    /// - `max_listed_candidates`: 12
    /// - `max_passes`: unbounded
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("upload"),
            tools: vec![ExtractionTool::Unzip, ExtractionTool::Ditto],
            dir_mode: 0o755,
            max_listed_candidates: 12,
            max_passes: None,
        }
    }
}
