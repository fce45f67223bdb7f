//! Candidate archive reference.

use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs;

/// An archive on disk together with its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipReference {
    /// Absolute path to the archive.
    pub path: PathBuf,
    /// Last modification time.
    pub modified: SystemTime,
}

impl ZipReference {
    /// Reads the modification time of `path`.
    ///
    /// Returns `None` if the file vanished or its metadata is unreadable;
    /// such candidates are simply not considered.
    pub async fn load(path: PathBuf) -> Option<Self> {
        let modified = fs::metadata(&path).await.ok()?.modified().ok()?;
        Some(Self { path, modified })
    }
}
