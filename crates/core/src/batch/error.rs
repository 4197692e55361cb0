//! Per-unit failure reasons.

use thiserror::Error;

use crate::source::SourceError;

/// Why one unit of a batch failed before or during resolution.
///
/// Rendered into the failure entry of the batch; never aborts the batch.
#[derive(Debug, Error)]
pub enum UnitError {
    /// Required reference fields are missing or blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// No file name supplied.
    #[error("file name is required")]
    MissingFileName,

    /// Zero-byte file.
    #[error("file is empty")]
    EmptyFile,

    /// File exceeds the configured limit.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// SharePoint fetch failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}
