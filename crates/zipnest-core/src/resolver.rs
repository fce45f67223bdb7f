//! Locating the archive to process.
//!
//! An explicit argument is tried as a path, then as a path inside the
//! upload directory, then as a case-insensitive basename searched
//! recursively in the upload directory. Without an argument the newest real
//! zip in the upload directory wins.

use crate::Error;
use crate::Result;
use crate::artifacts;
use crate::types::ZipReference;
use crate::walker;
use std::path::Path;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Default number of archive names listed when a lookup fails.
pub const DEFAULT_MAX_LISTED: usize = 12;

/// Resolves user input to an absolute archive path.
#[derive(Debug, Clone)]
pub struct PathResolver {
    upload_dir: PathBuf,
    base_dir: PathBuf,
    max_listed: usize,
}

impl PathResolver {
    /// Creates a resolver rooted at `upload_dir`, with relative paths
    /// resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// Fails if the working directory cannot be determined.
    pub fn new(upload_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = std::env::current_dir()?;
        Ok(Self::with_base_dir(upload_dir, base_dir))
    }

    /// Creates a resolver with an explicit base for relative paths.
    #[must_use]
    pub fn with_base_dir(upload_dir: impl AsRef<Path>, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            upload_dir: base_dir.join(upload_dir),
            base_dir,
            max_listed: DEFAULT_MAX_LISTED,
        }
    }

    /// Sets how many available archive names a failed lookup reports.
    #[must_use]
    pub fn max_listed(mut self, max_listed: usize) -> Self {
        self.max_listed = max_listed;
        self
    }

    /// Returns the directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the absolute upload directory.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Resolves `argument` (or its absence) to an absolute file path.
    ///
    /// A blank argument is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UploadDirMissing`], [`Error::NoZipInUploadDir`] or
    /// [`Error::NoMatch`] when nothing can be resolved.
    pub async fn resolve(&self, argument: Option<&str>) -> Result<PathBuf> {
        match argument.map(str::trim).filter(|a| !a.is_empty()) {
            Some(arg) => self.resolve_argument(arg).await,
            None => self.resolve_newest().await,
        }
    }

    async fn resolve_argument(&self, arg: &str) -> Result<PathBuf> {
        let direct = self.base_dir.join(arg);
        if is_file(&direct).await {
            debug!(path = %direct.display(), "resolved argument as path");
            return Ok(direct);
        }

        let in_upload = self.upload_dir.join(arg);
        if is_file(&in_upload).await {
            debug!(path = %in_upload.display(), "resolved argument inside upload directory");
            return Ok(in_upload);
        }

        self.ensure_upload_dir().await?;
        let wanted = arg.to_lowercase();
        let wanted_zip = format!("{wanted}.zip");

        let mut matches = Vec::new();
        for path in walker::list_files(&self.upload_dir).await? {
            let Some(name) = path.file_name() else {
                continue;
            };
            if artifacts::is_companion(name)
                || artifacts::is_inside_metadata_dir(&path, &self.upload_dir)
            {
                continue;
            }
            let name = name.to_string_lossy().to_lowercase();
            if (name == wanted || name == wanted_zip)
                && let Some(reference) = ZipReference::load(path).await
            {
                matches.push(reference);
            }
        }

        match matches.len() {
            0 => Err(Error::NoMatch {
                query: arg.to_string(),
                upload_dir: self.upload_dir.clone(),
                available: self.available_names().await?,
            }),
            1 => Ok(matches.remove(0).path),
            n => {
                for candidate in &matches {
                    debug!(
                        path = %candidate.path.display(),
                        modified = ?candidate.modified,
                        "matching candidate"
                    );
                }
                let chosen = newest(matches);
                warn!(
                    query = arg,
                    candidates = n,
                    chosen = %chosen.path.display(),
                    "several archives match; using the most recently modified"
                );
                Ok(chosen.path)
            }
        }
    }

    async fn resolve_newest(&self) -> Result<PathBuf> {
        self.ensure_upload_dir().await?;
        let candidates = self.real_zips().await?;
        if candidates.is_empty() {
            return Err(Error::NoZipInUploadDir {
                upload_dir: self.upload_dir.clone(),
            });
        }
        let chosen = newest(candidates);
        info!(path = %chosen.path.display(), "selected newest archive in upload directory");
        Ok(chosen.path)
    }

    async fn ensure_upload_dir(&self) -> Result<()> {
        match fs::metadata(&self.upload_dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(Error::UploadDirMissing {
                path: self.upload_dir.clone(),
            }),
        }
    }

    async fn real_zips(&self) -> Result<Vec<ZipReference>> {
        let mut zips = Vec::new();
        for path in walker::list_files(&self.upload_dir).await? {
            if artifacts::is_real_zip(&path, &self.upload_dir)
                && let Some(reference) = ZipReference::load(path).await
            {
                zips.push(reference);
            }
        }
        Ok(zips)
    }

    async fn available_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .real_zips()
            .await?
            .into_iter()
            .filter_map(|z| z.path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names.dedup();
        names.truncate(self.max_listed);
        Ok(names)
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Picks the most recently modified reference; equal times fall back to
/// the lexicographically smallest path so the choice is stable.
fn newest(mut candidates: Vec<ZipReference>) -> ZipReference {
    candidates.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
    candidates.swap_remove(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn touch(path: &Path, age_secs: u64) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"PK").unwrap();
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    fn resolver(temp: &TempDir) -> PathResolver {
        PathResolver::with_base_dir("upload", temp.path())
    }

    #[tokio::test]
    async fn test_explicit_path_relative_to_base() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("elsewhere/data.zip"), 0);

        let resolved = resolver(&temp)
            .resolve(Some("elsewhere/data.zip"))
            .await
            .unwrap();

        assert_eq!(resolved, temp.path().join("elsewhere/data.zip"));
    }

    #[tokio::test]
    async fn test_explicit_absolute_path() {
        let temp = TempDir::new().unwrap();
        let abs = temp.path().join("abs.zip");
        touch(&abs, 0);

        let resolved = resolver(&temp)
            .resolve(Some(abs.to_str().unwrap()))
            .await
            .unwrap();

        assert_eq!(resolved, abs);
    }

    #[tokio::test]
    async fn test_relative_to_upload_dir() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/batch/photos.zip"), 0);

        let resolved = resolver(&temp)
            .resolve(Some("batch/photos.zip"))
            .await
            .unwrap();

        assert_eq!(resolved, temp.path().join("upload/batch/photos.zip"));
    }

    #[tokio::test]
    async fn test_basename_match_adds_zip_suffix() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/deep/er/Photos.ZIP"), 0);

        let resolved = resolver(&temp).resolve(Some("photos")).await.unwrap();

        assert_eq!(resolved, temp.path().join("upload/deep/er/Photos.ZIP"));
    }

    #[tokio::test]
    async fn test_basename_match_ignores_metadata() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/__MACOSX/photos.zip"), 0);
        touch(&temp.path().join("upload/._photos.zip"), 0);
        touch(&temp.path().join("upload/real/photos.zip"), 100);

        let resolved = resolver(&temp).resolve(Some("photos")).await.unwrap();

        assert_eq!(resolved, temp.path().join("upload/real/photos.zip"));
    }

    #[tokio::test]
    async fn test_ambiguous_match_prefers_newest() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/a.zip"), 500);
        touch(&temp.path().join("upload/A.ZIP"), 10);

        let resolved = resolver(&temp).resolve(Some("a")).await.unwrap();

        assert_eq!(resolved, temp.path().join("upload/A.ZIP"));
    }

    #[tokio::test]
    async fn test_no_match_lists_available_bounded() {
        let temp = TempDir::new().unwrap();
        for i in 0..20 {
            touch(&temp.path().join(format!("upload/set{i:02}.zip")), 0);
        }
        touch(&temp.path().join("upload/._hidden.zip"), 0);

        let err = resolver(&temp).resolve(Some("missing")).await.unwrap_err();

        match err {
            Error::NoMatch {
                query, available, ..
            } => {
                assert_eq!(query, "missing");
                assert_eq!(available.len(), DEFAULT_MAX_LISTED);
                assert_eq!(available[0], "set00.zip");
                assert!(!available.iter().any(|n| n.starts_with("._")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_newest_without_argument() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/old.zip"), 1000);
        touch(&temp.path().join("upload/nested/new.zip"), 5);
        touch(&temp.path().join("upload/newer.txt"), 0);
        touch(&temp.path().join("upload/._newest.zip"), 0);

        let resolved = resolver(&temp).resolve(None).await.unwrap();

        assert_eq!(resolved, temp.path().join("upload/nested/new.zip"));
    }

    #[tokio::test]
    async fn test_blank_argument_treated_as_absent() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("upload/only.zip"), 0);

        let resolved = resolver(&temp).resolve(Some("  ")).await.unwrap();

        assert_eq!(resolved, temp.path().join("upload/only.zip"));
    }

    #[tokio::test]
    async fn test_missing_upload_dir() {
        let temp = TempDir::new().unwrap();

        let err = resolver(&temp).resolve(None).await.unwrap_err();

        assert!(matches!(err, Error::UploadDirMissing { .. }));
    }

    #[tokio::test]
    async fn test_empty_upload_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("upload")).unwrap();

        let err = resolver(&temp).resolve(None).await.unwrap_err();

        assert!(matches!(err, Error::NoZipInUploadDir { .. }));
    }

    #[test]
    fn test_newest_tie_breaks_on_path() {
        let now = SystemTime::now();
        let chosen = newest(vec![
            ZipReference {
                path: PathBuf::from("/u/b.zip"),
                modified: now,
            },
            ZipReference {
                path: PathBuf::from("/u/a.zip"),
                modified: now,
            },
        ]);
        assert_eq!(chosen.path, PathBuf::from("/u/a.zip"));
    }

    proptest::proptest! {
        #[test]
        fn prop_newest_is_latest_then_smallest_path(
            candidates in proptest::collection::vec(("[a-f]{1,3}", 0u64..5), 1..20),
        ) {
            let epoch = SystemTime::UNIX_EPOCH;
            let references: Vec<ZipReference> = candidates
                .iter()
                .map(|(name, secs)| ZipReference {
                    path: PathBuf::from(format!("/u/{name}.zip")),
                    modified: epoch + Duration::from_secs(*secs),
                })
                .collect();
            let latest = references.iter().map(|r| r.modified).max().unwrap();
            let expected = references
                .iter()
                .filter(|r| r.modified == latest)
                .map(|r| r.path.clone())
                .min()
                .unwrap();

            let chosen = newest(references);

            proptest::prop_assert_eq!(chosen.modified, latest);
            proptest::prop_assert_eq!(chosen.path, expected);
        }
    }
}
