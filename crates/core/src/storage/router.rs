//! Blob-first storage with local fallback.

use std::future::Future;

use bytes::Bytes;
use ferry_shared::StorageConfig;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::azure::AzureBlobStore;
use super::error::StorageError;
use super::local::LocalStore;
use super::naming::unique_name;
use super::types::{StorageKind, StorageResult};

/// Remote object store the router writes to before falling back.
pub trait ObjectStore: Send + Sync {
    /// Create the destination container if it does not exist.
    fn ensure_container(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Write `content` under `name` and return the object URL.
    fn put(
        &self,
        name: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// An object that landed in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Object URL.
    pub url: String,
    /// Name the object was written under.
    pub generated_name: String,
}

/// Result of a remote upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Remote write succeeded.
    Stored(RemoteObject),
    /// Remote write failed; the caller should use local storage.
    Fallback(String),
}

/// Routes each file to blob storage when configured, otherwise (or on
/// failure) to the local filesystem.
///
/// Built per request from immutable configuration; holds no cross-request state.
pub struct StorageRouter<R = AzureBlobStore> {
    remote: Option<R>,
    local: LocalStore,
}

impl StorageRouter<AzureBlobStore> {
    /// Build a router backed by Azure Blob Storage when a connection string
    /// is configured.
    #[must_use]
    pub fn from_config(config: &StorageConfig, http: Client) -> Self {
        Self::from_config_with(config, |connection_string, container| {
            AzureBlobStore::from_connection_string(connection_string, container, http)
        })
    }
}

impl<R: ObjectStore> StorageRouter<R> {
    /// Create a router from explicit backends.
    #[must_use]
    pub fn new(remote: Option<R>, local: LocalStore) -> Self {
        Self { remote, local }
    }

    /// Build a router, calling `connect` only when a connection string is
    /// configured.
    ///
    /// A store that fails to build is logged and the router runs local-only.
    pub fn from_config_with<F>(config: &StorageConfig, connect: F) -> Self
    where
        F: FnOnce(&str, &str) -> Result<R, StorageError>,
    {
        let remote = if config.is_remote_configured() {
            match connect(config.connection_string.trim(), &config.container) {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!(error = %e, "Blob storage misconfigured, using local storage only");
                    None
                }
            }
        } else {
            debug!("No storage connection string configured, using local storage");
            None
        };

        Self::new(remote, LocalStore::new(&config.local_path))
    }

    /// Whether a remote store will be attempted.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Store `content` as `file_name`.
    ///
    /// Never fails: remote errors fall back to local storage, and a local
    /// failure is reported through `success = false`.
    pub async fn store(&self, content: Bytes, file_name: &str) -> StorageResult {
        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);

        if let Some(remote) = &self.remote {
            match Self::upload_remote(remote, content.clone(), file_name).await {
                RemoteOutcome::Stored(object) => {
                    info!(
                        file_name = %file_name,
                        generated_name = %object.generated_name,
                        "Stored file in blob storage"
                    );
                    return StorageResult::stored(
                        StorageKind::Blob,
                        file_name,
                        object.url,
                        object.generated_name,
                        size,
                    );
                }
                RemoteOutcome::Fallback(reason) => {
                    warn!(
                        file_name = %file_name,
                        reason = %reason,
                        "Blob upload failed, falling back to local storage"
                    );
                }
            }
        }

        self.store_local(content, file_name, size).await
    }

    /// Attempt the remote upload, converting every failure into `Fallback`.
    pub async fn upload_remote(remote: &R, content: Bytes, file_name: &str) -> RemoteOutcome {
        if let Err(e) = remote.ensure_container().await {
            return RemoteOutcome::Fallback(e.to_string());
        }

        let generated_name = unique_name(file_name);
        match remote.put(&generated_name, content).await {
            Ok(url) => RemoteOutcome::Stored(RemoteObject {
                url,
                generated_name,
            }),
            Err(e) => RemoteOutcome::Fallback(e.to_string()),
        }
    }

    async fn store_local(&self, content: Bytes, file_name: &str, size: u64) -> StorageResult {
        let generated_name = unique_name(file_name);

        match self.local.write(&generated_name, content).await {
            Ok(path) => {
                info!(
                    file_name = %file_name,
                    path = %path.display(),
                    "Stored file in local storage"
                );
                StorageResult::stored(
                    StorageKind::Local,
                    file_name,
                    path.display().to_string(),
                    generated_name,
                    size,
                )
            }
            Err(e) => {
                error!(
                    file_name = %file_name,
                    path = %self.local.path_for(&generated_name).display(),
                    error = %e,
                    "Local storage failed"
                );
                StorageResult::local_failure(file_name, size, e.to_string())
            }
        }
    }
}
