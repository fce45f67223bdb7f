//! Iterative directory tree listing.
//!
//! Traversal keeps an explicit stack of pending directories instead of
//! recursing, so archive trees of any depth are listed without growing the
//! call stack. Symbolic links are reported as files and never followed.

use crate::Result;
use std::path::Path;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Files and directories found under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Every non-directory entry (regular files and symlinks).
    pub files: Vec<PathBuf>,
    /// Every directory below the root, excluding the root itself.
    pub dirs: Vec<PathBuf>,
}

/// Lists everything under `root` in a single traversal.
///
/// Returned paths are `root` joined with the relative entry path, so they
/// are absolute whenever `root` is. Order is unspecified.
///
/// # Errors
///
/// Fails only if `root` itself cannot be read. Unreadable subdirectories
/// are still reported in [`Listing::dirs`] but their contents are skipped.
pub async fn walk(root: &Path) -> Result<Listing> {
    let mut listing = Listing::default();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if dir.as_path() == root => return Err(e.into()),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "directory listing interrupted");
                    break;
                }
            };

            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {
                    listing.dirs.push(path.clone());
                    stack.push(path);
                }
                Ok(_) => listing.files.push(path),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "cannot stat entry");
                }
            }
        }
    }

    Ok(listing)
}

/// Lists every file under `dir`.
///
/// # Errors
///
/// Fails if `dir` cannot be read.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(walk(dir).await?.files)
}

/// Lists every directory under `dir`, excluding `dir`.
///
/// # Errors
///
/// Fails if `dir` cannot be read.
pub async fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(walk(dir).await?.dirs)
}
