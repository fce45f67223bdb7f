//! Output directory preparation with timestamped fallback.

use crate::Error;
use crate::Result;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;
use tokio::fs;
use tracing::warn;

/// A directory that exists and is empty, ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDir {
    /// The directory to extract into.
    pub path: PathBuf,
    /// `true` if this is the timestamped sibling, not the preferred path.
    pub is_fallback: bool,
}

/// Removes `path` recursively (if present) and recreates it empty.
///
/// # Errors
///
/// Fails if an existing entry cannot be removed (a regular file in the
/// way, missing permissions) or the directory cannot be created.
pub async fn reset_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(path).await
}

/// Returns the sibling `<name>_<millis>` of `preferred`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::path::PathBuf;
/// use zipnest_core::extract::fallback_path;
///
/// assert_eq!(
///     fallback_path(Path::new("/srv/out/photos_extracted"), 1_700_000_000_123),
///     PathBuf::from("/srv/out/photos_extracted_1700000000123"),
/// );
/// ```
#[must_use]
pub fn fallback_path(preferred: &Path, millis: u128) -> PathBuf {
    match preferred.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push(format!("_{millis}"));
            preferred.with_file_name(name)
        }
        None => {
            let mut raw = preferred.as_os_str().to_os_string();
            raw.push(format!("_{millis}"));
            PathBuf::from(raw)
        }
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Empties `preferred`, or falls back to a timestamped sibling.
///
/// The fallback name is not guaranteed unique if two preparations of the
/// same path happen within one millisecond.
///
/// # Errors
///
/// Returns [`Error::DirectoryPrep`] only if the fallback directory cannot
/// be created either.
pub async fn prepare_output_dir(preferred: &Path) -> Result<PreparedDir> {
    let original = match reset_dir(preferred).await {
        Ok(()) => {
            return Ok(PreparedDir {
                path: preferred.to_path_buf(),
                is_fallback: false,
            });
        }
        Err(e) => e,
    };

    let fallback = fallback_path(preferred, now_millis());
    warn!(
        preferred = %preferred.display(),
        fallback = %fallback.display(),
        error = %original,
        "cannot prepare output directory; using fallback"
    );

    fs::create_dir_all(&fallback)
        .await
        .map_err(|source| Error::DirectoryPrep {
            path: fallback.clone(),
            source,
        })?;

    Ok(PreparedDir {
        path: fallback,
        is_fallback: true,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("a/b/out");

        let prepared = prepare_output_dir(&out).await.unwrap();

        assert_eq!(prepared.path, out);
        assert!(!prepared.is_fallback);
        assert!(out.is_dir());
    }

    #[tokio::test]
    async fn test_prepare_clears_existing_contents() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        std::fs::create_dir_all(out.join("stale/dir")).unwrap();
        std::fs::write(out.join("stale/old.txt"), "old").unwrap();

        let prepared = prepare_output_dir(&out).await.unwrap();

        assert!(!prepared.is_fallback);
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_file_in_the_way_uses_fallback() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("photos_extracted");
        std::fs::write(&out, "not a directory").unwrap();

        let prepared = prepare_output_dir(&out).await.unwrap();

        assert!(prepared.is_fallback);
        assert!(prepared.path.is_dir());
        assert_eq!(prepared.path.parent(), out.parent());
        let name = prepared.path.file_name().unwrap().to_str().unwrap();
        let suffix = name.strip_prefix("photos_extracted_").unwrap();
        assert!(suffix.parse::<u128>().is_ok());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "not a directory");
    }

    #[test]
    fn test_fallback_path_without_file_name() {
        assert_eq!(fallback_path(Path::new("/"), 5), PathBuf::from("/_5"));
    }
}
