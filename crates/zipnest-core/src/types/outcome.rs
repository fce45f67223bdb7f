//! Result of a successful single-archive extraction.

use std::path::PathBuf;

/// Where and how one archive was extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Directory that now holds the archive contents. Differs from the
    /// requested directory when the fallback directory was used.
    pub output_dir: PathBuf,
    /// Name of the tool that succeeded.
    pub tool: String,
    /// `true` if the preferred directory could not be prepared.
    pub used_fallback_dir: bool,
}
