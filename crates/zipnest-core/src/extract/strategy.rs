//! Extraction strategies: external tools and the in-process fallback.

use crate::config::ExtractionTool;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Locale forced on external tools so unusual byte sequences in archive
/// member names are passed through instead of rejected.
const NEUTRAL_LOCALE: &str = "C";

/// One way of decompressing a zip into a directory.
///
/// Implementations report failure as diagnostic text; the caller decides
/// whether to try the next strategy.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Name used in logs and combined error messages.
    fn name(&self) -> &str;

    /// Extracts `archive` into the existing, empty directory `dest`.
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), String>;
}

/// One element of an external tool's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArg {
    /// Passed through unchanged.
    Literal(&'static str),
    /// Replaced by the archive path.
    Archive,
    /// Replaced by the destination directory.
    Dest,
}

/// An extraction program located on `PATH`.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    program: &'static str,
    args: Vec<ToolArg>,
}

impl ExternalTool {
    /// Creates a strategy running `program` with `args`.
    #[must_use]
    pub fn new(program: &'static str, args: Vec<ToolArg>) -> Self {
        Self { program, args }
    }

    /// `unzip -o -q <archive> -d <dest>`.
    #[must_use]
    pub fn unzip() -> Self {
        Self::new(
            "unzip",
            vec![
                ToolArg::Literal("-o"),
                ToolArg::Literal("-q"),
                ToolArg::Archive,
                ToolArg::Literal("-d"),
                ToolArg::Dest,
            ],
        )
    }

    /// `ditto -x -k <archive> <dest>`.
    #[must_use]
    pub fn ditto() -> Self {
        Self::new(
            "ditto",
            vec![
                ToolArg::Literal("-x"),
                ToolArg::Literal("-k"),
                ToolArg::Archive,
                ToolArg::Dest,
            ],
        )
    }

    /// Returns `true` if the program can be found on `PATH`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        which::which(self.program).is_ok()
    }

    fn build_args(&self, archive: &Path, dest: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg {
                ToolArg::Literal(s) => OsString::from(*s),
                ToolArg::Archive => archive.as_os_str().to_os_string(),
                ToolArg::Dest => dest.as_os_str().to_os_string(),
            })
            .collect()
    }
}

#[async_trait]
impl ExtractionStrategy for ExternalTool {
    fn name(&self) -> &str {
        self.program
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), String> {
        let program = which::which(self.program).map_err(|_| "not found on PATH".to_string())?;

        let output = Command::new(program)
            .args(self.build_args(archive, dest))
            .env("LC_ALL", NEUTRAL_LOCALE)
            .env("LANG", NEUTRAL_LOCALE)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| format!("failed to launch: {e}"))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        Err(format!("{}: {detail}", output.status))
    }
}

/// In-process extraction using the `zip` crate on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinZip;

#[async_trait]
impl ExtractionStrategy for BuiltinZip {
    fn name(&self) -> &str {
        ExtractionTool::Builtin.name()
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), String> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&archive).map_err(|e| format!("cannot open: {e}"))?;
            let mut zip = zip::ZipArchive::new(file)
                .map_err(|e| format!("failed to open ZIP archive: {e}"))?;
            zip.extract(&dest)
                .map_err(|e| format!("failed to extract ZIP archive: {e}"))
        })
        .await
        .map_err(|e| format!("extraction task failed: {e}"))?
    }
}

/// Builds the strategy for a configured tool.
#[must_use]
pub fn strategy_for(tool: ExtractionTool) -> Box<dyn ExtractionStrategy> {
    match tool {
        ExtractionTool::Unzip => Box::new(ExternalTool::unzip()),
        ExtractionTool::Ditto => Box::new(ExternalTool::ditto()),
        ExtractionTool::Builtin => Box::new(BuiltinZip),
    }
}
