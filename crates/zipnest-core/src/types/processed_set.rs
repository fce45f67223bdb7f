//! Set of archives already submitted for extraction.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

/// Absolute archive paths submitted to the extractor during one run.
///
/// Paths are only ever added, which bounds the nested loop: every pass
/// either claims at least one new path or finds nothing left to do.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipnest_core::types::ProcessedSet;
///
/// let mut processed = ProcessedSet::new();
/// assert!(processed.claim(Path::new("/out/inner.zip")));
/// assert!(!processed.claim(Path::new("/out/inner.zip")));
/// assert_eq!(processed.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessedSet(HashSet<PathBuf>);

impl ProcessedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` as submitted. Returns `false` if it already was.
    pub fn claim(&mut self, path: &Path) -> bool {
        self.0.insert(path.to_path_buf())
    }

    /// Returns `true` if `path` was already submitted.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains(path)
    }

    /// Number of submitted archives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was submitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
