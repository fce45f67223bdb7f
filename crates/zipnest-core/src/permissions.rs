//! Directory permission normalization.
//!
//! Archives created on other systems can carry directory modes such as
//! `0o555` or `0o000`, which block both nested extraction and cleanup.

use std::path::Path;
use tokio::fs;
use tracing::debug;

#[cfg(unix)]
async fn set_dir_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
async fn set_dir_mode(path: &Path, _mode: u32) -> std::io::Result<()> {
    let mut perms = fs::metadata(path).await?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms).await
}

/// Applies `mode` to `root` and every directory below it.
///
/// Each directory is updated before it is listed, so a directory that was
/// unreadable is opened up and then descended into within the same call.
/// Symbolic links are never followed. Failures are logged and skipped.
///
/// Returns the number of directories whose mode was set.
pub async fn normalize_permissions(root: &Path, mode: u32) -> usize {
    let mut updated = 0;
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        match set_dir_mode(&dir, mode).await {
            Ok(()) => updated += 1,
            Err(e) => debug!(dir = %dir.display(), error = %e, "chmod failed"),
        }

        let Ok(mut entries) = fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                stack.push(entry.path());
            }
        }
    }

    updated
}
