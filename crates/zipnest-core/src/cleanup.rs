//! Removal of platform metadata artifacts from an extracted tree.

use crate::Result;
use crate::artifacts;
use crate::walker;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use tracing::info;

/// What a cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Metadata files removed (`.DS_Store`, `._*`).
    pub files_removed: usize,
    /// Metadata directories removed (`__MACOSX`).
    pub dirs_removed: usize,
}

/// Removes metadata files, then metadata directories, under `root`.
///
/// Directories are removed deepest first (longest path first) so the
/// removal order does not depend on discovery order. Individual failures
/// are logged and skipped; only successful removals are counted.
///
/// # Errors
///
/// Fails only if `root` cannot be listed.
pub async fn clean_artifacts(root: &Path) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for file in walker::list_files(root).await? {
        if !file.file_name().is_some_and(artifacts::is_metadata_file) {
            continue;
        }
        match fs::remove_file(&file).await {
            Ok(()) => report.files_removed += 1,
            Err(e) => debug!(path = %file.display(), error = %e, "cannot remove metadata file"),
        }
    }

    let mut dirs: Vec<_> = walker::list_dirs(root)
        .await?
        .into_iter()
        .filter(|d| d.file_name().is_some_and(artifacts::is_metadata_dir))
        .collect();
    dirs.sort_by(|a, b| {
        b.as_os_str()
            .len()
            .cmp(&a.as_os_str().len())
            .then_with(|| a.cmp(b))
    });

    for dir in dirs {
        match fs::remove_dir_all(&dir).await {
            Ok(()) => report.dirs_removed += 1,
            Err(e) => debug!(path = %dir.display(), error = %e, "cannot remove metadata directory"),
        }
    }

    info!(
        files = report.files_removed,
        dirs = report.dirs_removed,
        "removed metadata artifacts"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_removes_markers_companions_and_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("__MACOSX/photos")).unwrap();
        std::fs::create_dir_all(root.join("photos")).unwrap();
        std::fs::write(root.join(".DS_Store"), "x").unwrap();
        std::fs::write(root.join("__MACOSX/._foo.png"), "x").unwrap();
        std::fs::write(root.join("__MACOSX/photos/._bar.png"), "x").unwrap();
        std::fs::write(root.join("photos/bar.png"), "img").unwrap();
        std::fs::write(root.join("photos/._bar.png"), "x").unwrap();

        let report = clean_artifacts(root).await.unwrap();

        assert_eq!(report.files_removed, 4);
        assert_eq!(report.dirs_removed, 1);
        assert!(!root.join("__MACOSX").exists());
        assert!(!root.join(".DS_Store").exists());
        assert!(!root.join("photos/._bar.png").exists());
        assert!(root.join("photos/bar.png").exists());
    }

    #[tokio::test]
    async fn test_nested_metadata_dirs_counted_individually() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("__MACOSX/inner/__MACOSX")).unwrap();
        std::fs::create_dir_all(root.join("sub/__MACOSX")).unwrap();

        let report = clean_artifacts(root).await.unwrap();

        assert_eq!(report.dirs_removed, 3);
        assert_eq!(report.files_removed, 0);
        assert!(root.join("sub").exists());
        assert!(!root.join("sub/__MACOSX").exists());
    }

    #[tokio::test]
    async fn test_clean_tree_is_noop() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("readme.md"), "hi").unwrap();

        let report = clean_artifacts(temp.path()).await.unwrap();

        assert_eq!(report, CleanupReport::default());
        assert!(temp.path().join("readme.md").exists());
    }
}
