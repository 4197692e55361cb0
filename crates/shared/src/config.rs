//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
///
/// Every section has defaults so the service starts without any configuration
/// in local-only storage mode with SharePoint mock mode enabled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// SharePoint (Microsoft Graph) configuration.
    pub sharepoint: SharePointConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Maximum request body size in bytes (all files of one request).
    pub max_body_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size: default_max_body_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_size() -> u64 {
    50 * 1024 * 1024
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Azure storage connection string. Blank means local storage only.
    pub connection_string: String,
    /// Blob container that receives uploads.
    pub container: String,
    /// Base directory for the local fallback.
    pub local_path: String,
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a local-only storage config rooted at `local_path`.
    #[must_use]
    pub fn local(local_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            ..Self::default()
        }
    }

    /// Set the connection string.
    #[must_use]
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Whether a remote connection descriptor is present.
    #[must_use]
    pub fn is_remote_configured(&self) -> bool {
        !self.connection_string.trim().is_empty()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            container: default_container(),
            local_path: default_local_path(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn default_container() -> String {
    "uploads".to_string()
}

fn default_local_path() -> String {
    "./uploads".to_string()
}

/// SharePoint credentials and endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SharePointConfig {
    /// Azure AD tenant ID.
    pub tenant_id: String,
    /// App registration client ID.
    pub client_id: String,
    /// App registration client secret.
    pub client_secret: String,
    /// OAuth2 authority host.
    pub authority_host: String,
    /// Microsoft Graph base URL.
    pub graph_base_url: String,
}

impl SharePointConfig {
    /// Create a config with the given credential triplet and default endpoints.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Override the OAuth2 authority and Graph endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, authority_host: impl Into<String>, graph: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self.graph_base_url = graph.into();
        self
    }

    /// Whether all three credentials are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.tenant_id, &self.client_id, &self.client_secret]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    /// Whether no credential is set at all. Only this enables mock mode; a
    /// partial set is a misconfiguration and fails each reference instead.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        [&self.tenant_id, &self.client_id, &self.client_secret]
            .iter()
            .all(|v| v.trim().is_empty())
    }
}

impl Default for SharePointConfig {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authority_host: "https://login.microsoftonline.com".to_string(),
            graph_base_url: "https://graph.microsoft.com".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FERRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
