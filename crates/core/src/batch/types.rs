//! Batch input and output types.

use bytes::Bytes;
use serde::Serialize;

use super::error::UnitError;
use crate::source::ExternalFileReference;
use crate::storage::StorageResult;

/// One directly uploaded file.
#[derive(Debug, Clone)]
pub struct UploadUnit {
    /// Original file name.
    pub file_name: String,
    /// File content.
    pub content: Bytes,
}

impl UploadUnit {
    /// Create a unit.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Failure stand-in for a unit that never produced a `StorageResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitFailure {
    /// File name (or best available label).
    pub file_name: String,
    /// Always false.
    pub success: bool,
    /// Failure reason.
    pub error: String,
}

impl UnitFailure {
    /// Create a failure entry.
    #[must_use]
    pub fn new(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            success: false,
            error: error.into(),
        }
    }
}

/// Placeholder returned per reference when SharePoint is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockResult {
    /// File name (or best available label).
    pub file_name: String,
    /// Always true; the request itself was handled.
    pub success: bool,
    /// Always true; nothing was fetched or stored.
    pub mock: bool,
    /// Explanation shown to the caller.
    pub message: String,
}

impl MockResult {
    /// Mock entry for `reference`.
    #[must_use]
    pub fn for_reference(reference: &ExternalFileReference) -> Self {
        Self {
            file_name: reference.label(),
            success: true,
            mock: true,
            message: "SharePoint is not configured; file was not fetched or stored".to_string(),
        }
    }
}

/// Outcome of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UnitOutcome {
    /// Reached the storage router (which may still report a local failure).
    Stored(StorageResult),
    /// Failed before storage.
    Failed(UnitFailure),
    /// Degraded-mode placeholder.
    Mock(MockResult),
}

impl UnitOutcome {
    /// Whether this unit counts as a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Stored(result) => result.success,
            Self::Failed(_) => false,
            Self::Mock(_) => true,
        }
    }

    /// File name reported for the unit.
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Stored(result) => &result.file_name,
            Self::Failed(failure) => &failure.file_name,
            Self::Mock(mock) => &mock.file_name,
        }
    }
}

/// Ordered outcomes, one per input unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    /// Outcomes in input order.
    pub results: Vec<UnitOutcome>,
}

impl BatchResult {
    /// Placeholder batch for degraded SharePoint mode.
    ///
    /// References with missing fields still fail individually; only valid
    /// ones are answered with a `MockResult`.
    #[must_use]
    pub fn mock(references: &[ExternalFileReference]) -> Self {
        Self {
            results: references
                .iter()
                .map(|r| match r.validate() {
                    Some(_) => UnitOutcome::Mock(MockResult::for_reference(r)),
                    None => UnitOutcome::Failed(UnitFailure::new(
                        r.label(),
                        UnitError::MissingFields(r.missing_fields()).to_string(),
                    )),
                })
                .collect(),
        }
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of successful units.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of failed units.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Processed {} file(s): {} succeeded, {} failed",
            self.len(),
            self.succeeded(),
            self.failed()
        )
    }
}
