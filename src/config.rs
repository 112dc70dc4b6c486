//! Configuration types
//!
//! `ClientConfig` is the immutable configuration bound to a Commando client
//! at construction. `AppConfig` is the YAML file read by the CLI:
//!
//! ```yaml
//! commando:
//!   base_url: https://commando.example.com/ws/api.php
//!   shared_secret: "..."
//!   timeout_seconds: 30
//! catalog:
//!   data_file: data/customer_csc.json
//! overrides:
//!   store_file: var/customer_csc_overrides.json
//! ```
//!
//! `COMMANDO_BASE_URL` and `COMMANDO_SHARED_SECRET` take precedence over
//! the file values.

use crate::attachments::AttachmentPolicy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding `commando.base_url`
pub const ENV_BASE_URL: &str = "COMMANDO_BASE_URL";

/// Environment variable overriding `commando.shared_secret`
pub const ENV_SHARED_SECRET: &str = "COMMANDO_SHARED_SECRET";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// ============================================================================
// Client Config
// ============================================================================

/// Configuration bound to a `CommandoClient`
#[derive(Clone)]
pub struct ClientConfig {
    /// Endpoint all requests are sent to
    pub base_url: Url,
    /// Signing key; never transmitted
    pub shared_secret: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config with the default timeout
    pub fn new(base_url: &str, shared_secret: impl Into<String>) -> Result<Self> {
        Self::builder()
            .base_url(base_url)
            .shared_secret(shared_secret)
            .build()
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("shared_secret", &"***")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for client config
#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    shared_secret: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            shared_secret: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: format!("commando-csc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the shared secret
    pub fn shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::missing_field("commando.base_url"))?;
        let shared_secret = self
            .shared_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field("commando.shared_secret"))?;

        let base_url = Url::parse(base_url.trim())
            .map_err(|e| Error::invalid_value("commando.base_url", e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "commando.base_url",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_value(
                "commando.timeout_seconds",
                "must be greater than zero",
            ));
        }

        Ok(ClientConfig {
            base_url,
            shared_secret,
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}

// ============================================================================
// Application Config (YAML)
// ============================================================================

/// Top-level application config loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Commando webservice settings
    #[serde(default)]
    pub commando: CommandoSection,

    /// Local CSC catalog settings
    #[serde(default)]
    pub catalog: CatalogSection,

    /// Per-user override store settings
    #[serde(default)]
    pub overrides: OverridesSection,

    /// Attachment policy
    #[serde(default)]
    pub attachments: AttachmentPolicy,
}

/// `commando:` section
#[derive(Clone, Serialize, Deserialize)]
pub struct CommandoSection {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub shared_secret: Option<String>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for CommandoSection {
    fn default() -> Self {
        Self {
            base_url: None,
            shared_secret: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl std::fmt::Debug for CommandoSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandoSection")
            .field("base_url", &self.base_url)
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// `catalog:` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// JSON file used when the webservice is unavailable
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// `overrides:` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverridesSection {
    /// JSON file holding per-user overrides; required by the write commands
    #[serde(default)]
    pub store_file: Option<PathBuf>,
}

impl AppConfig {
    /// Parse config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply `COMMANDO_*` environment overrides
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_SHARED_SECRET).ok(),
        )
    }

    /// Replace the base URL and/or secret when a value is given
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, shared_secret: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.is_empty()) {
            self.commando.base_url = Some(url);
        }
        if let Some(secret) = shared_secret.filter(|s| !s.is_empty()) {
            self.commando.shared_secret = Some(secret);
        }
        self
    }

    /// Build the client config from the `commando:` section
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder()
            .timeout(Duration::from_secs(self.commando.timeout_seconds));
        if let Some(url) = &self.commando.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(secret) = &self.commando.shared_secret {
            builder = builder.shared_secret(secret.clone());
        }
        builder.build()
    }
}
