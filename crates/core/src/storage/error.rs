//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection string could not be parsed.
    #[error("invalid storage connection string: {0}")]
    InvalidConnectionString(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Container could not be created or verified.
    #[error("container request failed with status {status}: {message}")]
    ContainerCreation {
        /// HTTP status returned by the storage service (0 when no response).
        status: u16,
        /// Response body or transport error.
        message: String,
    },

    /// Remote object operation failed.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Local filesystem write failed.
    #[error("local storage failed: {0}")]
    LocalIo(String),
}

impl StorageError {
    /// Create an invalid connection string error.
    #[must_use]
    pub fn invalid_connection_string(msg: impl Into<String>) -> Self {
        Self::InvalidConnectionString(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Create a local I/O error.
    #[must_use]
    pub fn local_io(msg: impl Into<String>) -> Self {
        Self::LocalIo(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::ContainerCreation {
            status: err.status().map_or(0, |s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
