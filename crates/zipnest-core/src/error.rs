//! Error types for the nested extraction pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the pipeline [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A single extraction tool's failure for one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    /// Name of the tool that was tried (e.g. `unzip`).
    pub tool: String,
    /// Diagnostic text: stderr, exit status, or launch failure.
    pub diagnostic: String,
}

impl ToolFailure {
    /// Creates a failure record for `tool`.
    pub fn new(tool: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tool, self.diagnostic.trim())
    }
}

/// Joins tool failures into a single `; `-separated line.
fn join_failures(failures: &[ToolFailure]) -> String {
    if failures.is_empty() {
        return "no extraction tools configured".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

/// Errors produced by the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload directory does not exist.
    #[error("upload directory not found: {path}")]
    UploadDirMissing {
        /// Absolute upload directory path.
        path: PathBuf,
    },

    /// No argument was given and the upload directory holds no zip.
    #[error("no zip archives found in {upload_dir}")]
    NoZipInUploadDir {
        /// Absolute upload directory path.
        upload_dir: PathBuf,
    },

    /// The argument matched nothing in the upload directory.
    #[error(
        "no archive matching '{query}' in {upload_dir} (available: {})",
        join_available(.available)
    )]
    NoMatch {
        /// The user-supplied argument.
        query: String,
        /// Absolute upload directory path.
        upload_dir: PathBuf,
        /// A bounded, sorted list of available zip basenames.
        available: Vec<String>,
    },

    /// The resolved file is not a `.zip`.
    #[error("not a zip archive: {path}")]
    NotAZip {
        /// The resolved path.
        path: PathBuf,
    },

    /// Neither the preferred output directory nor its fallback could be
    /// prepared.
    #[error("cannot prepare output directory {path}: {source}")]
    DirectoryPrep {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Every extraction tool failed for an archive.
    #[error("failed to extract {archive}: {}", join_failures(.failures))]
    Extraction {
        /// The archive that could not be extracted.
        archive: PathBuf,
        /// One entry per tool tried, in order.
        failures: Vec<ToolFailure>,
    },
}

impl Error {
    /// Returns `true` if no archive could be resolved from the input.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use zipnest_core::Error;
    ///
    /// let err = Error::UploadDirMissing {
    ///     path: PathBuf::from("/srv/upload"),
    /// };
    /// assert!(err.is_resolution_error());
    /// assert!(!err.is_usage_error());
    /// ```
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UploadDirMissing { .. } | Self::NoZipInUploadDir { .. } | Self::NoMatch { .. }
        )
    }

    /// Returns `true` if the input was resolved but is not usable as a zip.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::NotAZip { .. })
    }
}
