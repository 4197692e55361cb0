//! Storage result types.

use serde::Serialize;

/// Backend that holds (or failed to hold) a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Remote blob container.
    Blob,
    /// Local filesystem fallback.
    Local,
}

impl StorageKind {
    /// Wire name of the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Local => "local",
        }
    }
}

/// Outcome of storing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResult {
    /// Whether the bytes were persisted.
    pub success: bool,
    /// Original file name supplied by the caller.
    pub file_name: String,
    /// Backend used for the final attempt.
    pub storage: StorageKind,
    /// Blob URL or filesystem path.
    pub location: String,
    /// Unique name the file was written under.
    pub generated_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Failure reason, only set when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StorageResult {
    pub(crate) fn stored(
        storage: StorageKind,
        file_name: &str,
        location: String,
        generated_name: String,
        size: u64,
    ) -> Self {
        Self {
            success: true,
            file_name: file_name.to_string(),
            storage,
            location,
            generated_name,
            size,
            error: None,
        }
    }

    /// Nothing was written, so `location` and `generated_name` stay empty.
    pub(crate) fn local_failure(file_name: &str, size: u64, error: String) -> Self {
        Self {
            success: false,
            file_name: file_name.to_string(),
            storage: StorageKind::Local,
            location: String::new(),
            generated_name: String::new(),
            size,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_camel_case() {
        let result = StorageResult::stored(
            StorageKind::Blob,
            "a.txt",
            "https://acct.blob.core.windows.net/uploads/x-a.txt".to_string(),
            "x-a.txt".to_string(),
            3,
        );
        let json = serde_json::to_value(&result).expect("serializable");

        assert_eq!(json["storage"], "blob");
        assert_eq!(json["generatedName"], "x-a.txt");
        assert_eq!(json["fileName"], "a.txt");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_local_failure_carries_error() {
        let result = StorageResult::local_failure("a.txt", 3, "permission denied".to_string());
        assert!(!result.success);
        assert_eq!(result.storage.as_str(), "local");
        assert_eq!(result.error.as_deref(), Some("permission denied"));
        assert!(result.location.is_empty());
        assert!(result.generated_name.is_empty());
    }
}
