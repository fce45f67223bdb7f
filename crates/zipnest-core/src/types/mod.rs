//! Value types shared across the pipeline.

mod outcome;
mod processed_set;
mod zip_reference;

pub use outcome::ExtractionOutcome;
pub use processed_set::ProcessedSet;
pub use zip_reference::ZipReference;
