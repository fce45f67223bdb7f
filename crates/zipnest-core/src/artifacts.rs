//! Classification of platform metadata artifacts and real zip files.
//!
//! macOS archivers add `.DS_Store` files, `._name` AppleDouble companions
//! and a `__MACOSX` directory holding them. None of these carry user
//! content, and a `._report.zip` companion is not a zip at all.

use std::ffi::OsStr;
use std::path::Path;

/// Exact file name of the Finder metadata marker.
pub const METADATA_MARKER: &str = ".DS_Store";

/// Prefix of AppleDouble metadata companions.
pub const COMPANION_PREFIX: &str = "._";

/// Name of the metadata-only directory.
pub const METADATA_DIR: &str = "__MACOSX";

fn name_str(name: &OsStr) -> Option<&str> {
    name.to_str()
}

/// Returns `true` if `name` is a metadata companion (`._*`).
#[must_use]
pub fn is_companion(name: &OsStr) -> bool {
    name_str(name).is_some_and(|n| n.starts_with(COMPANION_PREFIX))
}

/// Returns `true` if a file with this name should be removed by cleanup.
#[must_use]
pub fn is_metadata_file(name: &OsStr) -> bool {
    name_str(name).is_some_and(|n| n == METADATA_MARKER || n.starts_with(COMPANION_PREFIX))
}

/// Returns `true` if a directory with this name is metadata-only.
#[must_use]
pub fn is_metadata_dir(name: &OsStr) -> bool {
    name == METADATA_DIR
}

/// Returns `true` if `path` has a `.zip` extension (any case).
#[must_use]
pub fn has_zip_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Returns `true` if any component of `path` below `root` is `__MACOSX`.
///
/// Components of `root` itself are not inspected, so an upload directory
/// that happens to live under a `__MACOSX` folder still works.
#[must_use]
pub fn is_inside_metadata_dir(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .parent()
        .is_some_and(|parent| parent.components().any(|c| is_metadata_dir(c.as_os_str())))
}

/// Returns `true` if `path` (found under `root`) is a real zip archive:
/// `.zip` extension, not a companion, not inside a metadata directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipnest_core::artifacts::is_real_zip;
///
/// let root = Path::new("/srv/upload");
/// assert!(is_real_zip(Path::new("/srv/upload/batch/photos.ZIP"), root));
/// assert!(!is_real_zip(Path::new("/srv/upload/._photos.zip"), root));
/// assert!(!is_real_zip(Path::new("/srv/upload/__MACOSX/photos.zip"), root));
/// ```
#[must_use]
pub fn is_real_zip(path: &Path, root: &Path) -> bool {
    has_zip_extension(path)
        && !path.file_name().is_some_and(is_companion)
        && !is_inside_metadata_dir(path, root)
}
