//! Recursive zip extraction and normalization pipeline.
//!
//! `zipnest-core` resolves an uploaded zip, extracts it through an ordered
//! chain of tools (`unzip`, then `ditto`), keeps extracting any zip found in
//! the result until no new ones appear, strips macOS metadata artifacts and
//! reports what the final tree contains.
//!
//! # Examples
//!
//! ```no_run
//! use zipnest_core::PipelineConfig;
//! use zipnest_core::run_pipeline;
//!
//! # async fn run() -> zipnest_core::Result<()> {
//! let config = PipelineConfig::default();
//! let report = run_pipeline(&config, None, None).await?;
//! println!("{} files in {}", report.total_files, report.output_dir.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod artifacts;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod extract;
pub mod nested;
pub mod permissions;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod test_utils;
pub mod types;
pub mod walker;

// Re-export main API types
pub use api::run_pipeline;
pub use config::PipelineConfig;
pub use error::Error;
pub use error::Result;
pub use pipeline::Pipeline;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::RunReport;
pub use resolver::PathResolver;
