//! Test utilities: in-memory zip builders and instrumented strategies.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use crate::extract::BuiltinZip;
use crate::extract::ExtractionStrategy;
use async_trait::async_trait;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Entries ending in `/` become
/// directories with mode 0o755. Files are stored uncompressed with mode
/// 0o644.
///
/// # Examples
///
/// ```
/// use zipnest_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert!(zip_data.starts_with(b"PK"));
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        if path.ends_with('/') {
            zip.add_directory(path, options.unix_permissions(0o755))
                .unwrap();
        } else {
            zip.start_file(path, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Builds a zip nested `levels` deep: `level1.zip` contains `level2.zip`
/// and so on; the innermost archive holds `core.txt`.
#[must_use]
pub fn create_nested_zip(levels: usize) -> Vec<u8> {
    let mut data = create_test_zip(vec![("core.txt", b"core")]);
    for level in (2..=levels).rev() {
        let name = format!("level{level}.zip");
        data = create_test_zip(vec![(name.as_str(), data.as_slice())]);
    }
    data
}

/// Writes `data` to `path`, creating parent directories.
pub fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, data).unwrap();
}

#[derive(Debug, Clone)]
enum Behavior {
    Fail(String),
    FailWithDebris(String),
    Builtin,
}

/// Strategy that records every archive it is asked to extract.
#[derive(Debug, Clone)]
pub struct RecordingStrategy {
    name: String,
    behavior: Behavior,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingStrategy {
    /// Always fails with `diagnostic`.
    #[must_use]
    pub fn failing(name: &str, diagnostic: &str) -> Self {
        Self::with_behavior(name, Behavior::Fail(diagnostic.to_string()))
    }

    /// Writes `debris` into the destination, then fails.
    #[must_use]
    pub fn failing_with_debris(name: &str, debris: &str) -> Self {
        Self::with_behavior(name, Behavior::FailWithDebris(debris.to_string()))
    }

    /// Delegates to [`BuiltinZip`].
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_behavior("recording-builtin", Behavior::Builtin)
    }

    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: Arc::default(),
        }
    }

    /// Shared handle to the recorded archive paths.
    #[must_use]
    pub fn calls(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ExtractionStrategy for RecordingStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, archive: &Path, dest: &Path) -> Result<(), String> {
        self.calls.lock().unwrap().push(archive.to_path_buf());
        match &self.behavior {
            Behavior::Fail(diagnostic) => Err(diagnostic.clone()),
            Behavior::FailWithDebris(debris) => {
                std::fs::write(dest.join(debris), b"partial").unwrap();
                Err("failed midway".to_string())
            }
            Behavior::Builtin => BuiltinZip.extract(archive, dest).await,
        }
    }
}
