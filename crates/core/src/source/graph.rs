//! Microsoft Graph client for SharePoint file content.

use std::time::{Duration, Instant};

use bytes::Bytes;
use ferry_shared::SharePointConfig;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::SourceError;
use super::resolver::FileSource;

/// Client-credentials scope for Microsoft Graph.
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3599
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Authenticated Graph client. One instance serves a whole request batch so
/// the access token is fetched once.
pub struct GraphClient {
    http: Client,
    config: SharePointConfig,
    token: Mutex<Option<CachedToken>>,
}

impl GraphClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if any credential is blank.
    pub fn new(config: SharePointConfig, http: Client) -> Result<Self, SourceError> {
        if !config.is_complete() {
            return Err(SourceError::NotConfigured);
        }

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_host.trim_end_matches('/'),
            self.config.tenant_id.trim()
        )
    }

    /// `GET` URL for a drive item's content.
    pub fn content_url(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
    ) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.config.graph_base_url)
            .map_err(|e| SourceError::fetch_failed(format!("invalid Graph URL: {e}")))?;

        url.path_segments_mut()
            .map_err(|()| SourceError::fetch_failed("invalid Graph URL"))?
            .pop_if_empty()
            .extend([
                "v1.0", "sites", site_id, "drives", drive_id, "items", item_id, "content",
            ]);

        Ok(url)
    }

    async fn access_token(&self) -> Result<String, SourceError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Instant::now()) {
            return Ok(token.value.clone());
        }

        debug!(tenant_id = %self.config.tenant_id, "Requesting Graph access token");

        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| SourceError::fetch_failed(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::fetch_failed(format!(
                "token request failed with status {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::fetch_failed(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_SKEW);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    /// Download the full content of a drive item.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` on token, transport, or non-2xx errors.
    pub async fn download(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
    ) -> Result<Bytes, SourceError> {
        let token = self.access_token().await?;
        let url = self.content_url(site_id, drive_id, item_id)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SourceError::fetch_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::fetch_failed(format!(
                "Graph returned {status}: {body}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| SourceError::fetch_failed(e.to_string()))
    }
}

impl FileSource for GraphClient {
    async fn fetch(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
    ) -> Result<Bytes, SourceError> {
        self.download(site_id, drive_id, item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GraphClient {
        let config = SharePointConfig::new("contoso", "client-id", "s3cret")
            .with_endpoints(server.uri(), server.uri());
        GraphClient::new(config, Client::new()).expect("complete credentials")
    }

    async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/contoso/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "tok-123"
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[test]
    fn test_incomplete_credentials_are_rejected() {
        let config = SharePointConfig::new("contoso", "client-id", "");
        let err = GraphClient::new(config, Client::new()).err();
        assert!(matches!(err, Some(SourceError::NotConfigured)));
    }

    #[test]
    fn test_content_url_layout() {
        let config = SharePointConfig::new("t", "c", "s");
        let client = GraphClient::new(config, Client::new()).expect("complete credentials");

        let url = client
            .content_url("site-1", "drive-1", "item-1")
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/sites/site-1/drives/drive-1/items/item-1/content"
        );
    }

    #[tokio::test]
    async fn test_download_reuses_token() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1.0/sites/site-1/drives/drive-1/items/item-1/content"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"file-bytes".to_vec()))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client
            .download("site-1", "drive-1", "item-1")
            .await
            .expect("first download");
        let second = client
            .fetch("site-1", "drive-1", "item-1")
            .await
            .expect("second download");

        assert_eq!(first, Bytes::from_static(b"file-bytes"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_item_is_fetch_failure() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1.0/sites/site-1/drives/drive-1/items/gone/content"))
            .respond_with(ResponseTemplate::new(404).set_body_string("itemNotFound"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.download("site-1", "drive-1", "gone").await.unwrap_err();

        match err {
            SourceError::FetchFailed(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("itemNotFound"));
            }
            SourceError::NotConfigured => panic!("expected fetch failure"),
        }
    }

    #[tokio::test]
    async fn test_rejected_token_skips_content_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contoso/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.download("site-1", "drive-1", "item-1").await.unwrap_err();
        assert!(matches!(err, SourceError::FetchFailed(ref m) if m.contains("401")));
    }
}
