//! Azure Blob Storage backend.
//!
//! Object writes go through an OpenDAL `Azblob` operator. OpenDAL has no
//! container-management API, so `ensure_container` issues the
//! `PUT {container}?restype=container` call itself, signed with SharedKey.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use opendal::{Operator, services};
use reqwest::{
    Client, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_LENGTH},
};
use sha2::Sha256;
use tracing::debug;

use super::error::StorageError;
use super::router::ObjectStore;

type HmacSha256 = Hmac<Sha256>;

/// Blob service REST version used for container requests.
pub const API_VERSION: &str = "2021-08-06";

/// Parsed Azure storage connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    /// Storage account name.
    pub account_name: String,
    /// Base64 storage account key.
    pub account_key: String,
    /// Blob service endpoint without trailing slash.
    pub blob_endpoint: String,
}

impl ConnectionString {
    /// Parse a `Key=Value;Key=Value` connection string.
    ///
    /// `AccountName` and `AccountKey` are required. The blob endpoint comes from
    /// `BlobEndpoint` when present, otherwise from `DefaultEndpointsProtocol`
    /// and `EndpointSuffix`.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let mut protocol = "https";
        let mut suffix = "core.windows.net";
        let mut account_name = None;
        let mut account_key = None;
        let mut blob_endpoint = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(StorageError::invalid_connection_string(
                    "segment without '=' separator",
                ));
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => protocol = value,
                "endpointsuffix" => suffix = value,
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                _ => {}
            }
        }

        let account_name = account_name
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorageError::invalid_connection_string("missing AccountName"))?;
        let account_key = account_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StorageError::invalid_connection_string("missing AccountKey"))?;
        if BASE64_STANDARD.decode(account_key).is_err() {
            return Err(StorageError::invalid_connection_string(
                "AccountKey is not valid base64",
            ));
        }

        let blob_endpoint = blob_endpoint.map_or_else(
            || format!("{protocol}://{account_name}.blob.{suffix}"),
            |endpoint| endpoint.trim_end_matches('/').to_string(),
        );

        Ok(Self {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
            blob_endpoint,
        })
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("blob_endpoint", &self.blob_endpoint)
            .finish()
    }
}

/// Azure Blob Storage object store bound to one container.
pub struct AzureBlobStore {
    operator: Operator,
    http: Client,
    connection: ConnectionString,
    container: String,
}

impl AzureBlobStore {
    /// Create a store for `container`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OpenDAL operator cannot be built.
    pub fn new(
        connection: ConnectionString,
        container: impl Into<String>,
        http: Client,
    ) -> Result<Self, StorageError> {
        let container = container.into();
        let builder = services::Azblob::default()
            .endpoint(&connection.blob_endpoint)
            .account_name(&connection.account_name)
            .account_key(&connection.account_key)
            .container(&container);

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self {
            operator,
            http,
            connection,
            container,
        })
    }

    /// Parse `raw` and create a store for `container`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is malformed.
    pub fn from_connection_string(
        raw: &str,
        container: &str,
        http: Client,
    ) -> Result<Self, StorageError> {
        Self::new(ConnectionString::parse(raw)?, container, http)
    }

    /// URL of the container.
    #[must_use]
    pub fn container_url(&self) -> String {
        format!("{}/{}", self.connection.blob_endpoint, self.container)
    }

    /// Public URL of an object in the container.
    #[must_use]
    pub fn object_url(&self, name: &str) -> String {
        format!("{}/{name}", self.container_url())
    }

    fn authorization(&self, verb: &str, url: &Url, date: &str) -> Result<String, StorageError> {
        let key = BASE64_STANDARD
            .decode(&self.connection.account_key)
            .map_err(|_| StorageError::invalid_connection_string("AccountKey is not valid base64"))?;

        let resource = canonical_resource(&self.connection.account_name, url);
        let payload = string_to_sign(verb, date, &resource);

        let mut mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| StorageError::configuration(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!(
            "SharedKey {}:{signature}",
            self.connection.account_name
        ))
    }
}

impl ObjectStore for AzureBlobStore {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        let mut url =
            Url::parse(&self.container_url()).map_err(|e| StorageError::configuration(e.to_string()))?;
        url.query_pairs_mut().append_pair("restype", "container");

        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let authorization = self.authorization("PUT", &url, &date)?;

        let response = self
            .http
            .put(url)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                debug!(container = %self.container, "Created blob container");
                Ok(())
            }
            // ContainerAlreadyExists
            StatusCode::CONFLICT => Ok(()),
            status => Err(StorageError::ContainerCreation {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn put(&self, name: &str, content: Bytes) -> Result<String, StorageError> {
        self.operator.write(name, content).await?;
        Ok(self.object_url(name))
    }
}

/// SharedKey canonicalized resource: `/{account}{path}` then sorted query params.
fn canonical_resource(account: &str, url: &Url) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
        .collect();
    params.sort();

    let mut resource = format!("/{account}{}", url.path());
    for (key, value) in params {
        resource.push('\n');
        resource.push_str(&key);
        resource.push(':');
        resource.push_str(&value);
    }
    resource
}

/// SharedKey string-to-sign for a body-less request.
fn string_to_sign(verb: &str, date: &str, resource: &str) -> String {
    // Eleven standard headers, all empty for a zero-length request.
    format!(
        "{verb}\n{}x-ms-date:{date}\nx-ms-version:{API_VERSION}\n{resource}",
        "\n".repeat(11)
    )
}
