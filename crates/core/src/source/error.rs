//! Source resolution errors.

use thiserror::Error;

/// Errors fetching a file from SharePoint.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Tenant, client ID, or client secret is missing.
    #[error("SharePoint credentials are not configured")]
    NotConfigured,

    /// Token acquisition or the content read failed.
    #[error("failed to fetch file from SharePoint: {0}")]
    FetchFailed(String),
}

impl SourceError {
    /// Create a fetch failure.
    #[must_use]
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }
}
