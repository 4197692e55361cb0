//! Source resolver: turns a SharePoint reference into file bytes.

use std::future::Future;

use bytes::Bytes;
use ferry_shared::SharePointConfig;
use reqwest::Client;

use super::error::SourceError;
use super::graph::GraphClient;

/// Read access to a remote document store.
pub trait FileSource: Send + Sync {
    /// Fetch the full content of one item.
    fn fetch(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
    ) -> impl Future<Output = Result<Bytes, SourceError>> + Send;
}

/// Fetches referenced files, or refuses with `NotConfigured` when no
/// credentials are available. Never touches the network in that case.
pub struct SourceResolver<S = GraphClient> {
    source: Option<S>,
}

impl SourceResolver<GraphClient> {
    /// Build a resolver with a Graph client if the credentials are complete.
    #[must_use]
    pub fn from_config(config: &SharePointConfig, http: Client) -> Self {
        Self::new(GraphClient::new(config.clone(), http).ok())
    }
}

impl<S: FileSource> SourceResolver<S> {
    /// Create a resolver from an optional source.
    #[must_use]
    pub fn new(source: Option<S>) -> Self {
        Self { source }
    }

    /// Whether a source is available.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch one file.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without credentials, otherwise whatever the source reports.
    pub async fn fetch(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
    ) -> Result<Bytes, SourceError> {
        let Some(source) = &self.source else {
            return Err(SourceError::NotConfigured);
        };
        source.fetch(site_id, drive_id, item_id).await
    }
}
