//! Error conversion utilities for CLI.
//!
//! Converts zipnest-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use zipnest_core::Error;
use zipnest_core::error::ToolFailure;

/// Converts a pipeline `Error` to a user-friendly anyhow error with a hint.
pub fn convert_pipeline_error(err: Error) -> anyhow::Error {
    match err {
        Error::UploadDirMissing { path } => {
            anyhow!(
                "Upload directory not found: {}\n\
                 HINT: Create it, or point --upload-dir at the directory holding your archives.",
                path.display()
            )
        }
        Error::NoZipInUploadDir { upload_dir } => {
            anyhow!(
                "No zip archives found in {}\n\
                 HINT: Copy an archive there, or pass its path as the first argument.",
                upload_dir.display()
            )
        }
        Error::NoMatch {
            query,
            upload_dir,
            available,
        } => {
            let hint = if available.is_empty() {
                "The upload directory contains no zip archives.".to_string()
            } else {
                format!("Available archives: {}", available.join(", "))
            };
            anyhow!(
                "No archive matching '{query}' in {}\n\
                 HINT: {hint}",
                upload_dir.display()
            )
        }
        Error::NotAZip { path } => {
            anyhow!(
                "Not a zip archive: {}\n\
                 HINT: Only files with a .zip extension are processed.",
                path.display()
            )
        }
        Error::Extraction { archive, failures } => {
            let details = failures
                .iter()
                .map(|f| format!("\n  {f}"))
                .collect::<String>();
            anyhow!(
                "Failed to extract '{}':{details}\n\
                 HINT: {}",
                archive.display(),
                extraction_hint(&failures)
            )
        }
        Error::DirectoryPrep { path, source } => {
            anyhow!(
                "Cannot create output directory '{}': {source}\n\
                 HINT: Check the permissions of the parent directory, or pass a different OUTPUT.",
                path.display()
            )
        }
        Error::Io(io_err) => anyhow!("I/O error: {io_err}"),
    }
}

fn extraction_hint(failures: &[ToolFailure]) -> &'static str {
    if failures.is_empty() {
        "No extraction tool is configured; pass --tool."
    } else if failures
        .iter()
        .all(|f| f.diagnostic.contains("not found on PATH"))
    {
        "Install unzip, or use --tool builtin for the in-process extractor."
    } else {
        "The archive may be corrupted or malformed."
    }
}

/// Converts a pipeline result into an anyhow result with guidance.
pub fn add_run_context<T>(result: zipnest_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_pipeline_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_no_match_lists_available() {
        let err = Error::NoMatch {
            query: "photos".to_string(),
            upload_dir: PathBuf::from("/srv/upload"),
            available: vec!["a.zip".to_string(), "b.zip".to_string()],
        };
        let msg = format!("{:?}", convert_pipeline_error(err));
        assert!(msg.contains("'photos'"));
        assert!(msg.contains("HINT: Available archives: a.zip, b.zip"));
    }

    #[test]
    fn test_convert_no_match_without_candidates() {
        let err = Error::NoMatch {
            query: "photos".to_string(),
            upload_dir: PathBuf::from("/srv/upload"),
            available: Vec::new(),
        };
        let msg = format!("{:?}", convert_pipeline_error(err));
        assert!(msg.contains("contains no zip archives"));
    }

    #[test]
    fn test_convert_missing_tools() {
        let err = Error::Extraction {
            archive: PathBuf::from("photos.zip"),
            failures: vec![
                ToolFailure::new("unzip", "not found on PATH"),
                ToolFailure::new("ditto", "not found on PATH"),
            ],
        };
        let msg = format!("{:?}", convert_pipeline_error(err));
        assert!(msg.contains("unzip: not found on PATH"));
        assert!(msg.contains("--tool builtin"));
    }

    #[test]
    fn test_convert_corrupt_archive() {
        let err = Error::Extraction {
            archive: PathBuf::from("photos.zip"),
            failures: vec![ToolFailure::new("unzip", "exit status: 9: bad zipfile")],
        };
        let msg = format!("{:?}", convert_pipeline_error(err));
        assert!(msg.contains("corrupted"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let msg = format!("{:?}", convert_pipeline_error(err));
        assert!(msg.contains("I/O error"));
    }
}
