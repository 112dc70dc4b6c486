//! Error types for the Commando CSC client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the Commando CSC client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Remote API Errors
    // ============================================================================
    #[error("Commando API returned HTTP {status}: {body}")]
    RemoteHttp { status: u16, body: String },

    #[error("Commando API response is not valid JSON: {message}")]
    RemoteDecode { message: String },

    #[error("Commando API call failed: {source}")]
    RemoteCall {
        #[source]
        source: reqwest::Error,
    },

    // ============================================================================
    // Request Signing Errors
    // ============================================================================
    #[error("Parameter '{key}' is reserved and added by the client")]
    ReservedParameter { key: String },

    #[error("Invalid timestamp '{value}': expected 14 digits YYYYMMDDHHMMSS")]
    InvalidTimestamp { value: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // CSC Data Errors
    // ============================================================================
    #[error("CSC '{reference}' not found")]
    CscNotFound { reference: String },

    #[error("Invalid CSC data for '{reference}': {message}")]
    InvalidCsc { reference: String, message: String },

    #[error("Override store error: {message}")]
    Store { message: String },

    #[error("Attachment '{name}' rejected: {reason}")]
    InvalidAttachment { name: String, reason: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a remote HTTP status error
    pub fn remote_http(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteHttp {
            status,
            body: body.into(),
        }
    }

    /// Create a remote decode error
    pub fn remote_decode(message: impl Into<String>) -> Self {
        Self::RemoteDecode {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a CSC not found error
    pub fn csc_not_found(reference: impl Into<String>) -> Self {
        Self::CscNotFound {
            reference: reference.into(),
        }
    }

    /// Create an invalid CSC data error
    pub fn invalid_csc(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCsc {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a rejected attachment error
    pub fn invalid_attachment(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttachment {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Whether this error came from talking to the Commando API.
    ///
    /// Callers use this to decide whether local data can stand in.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::RemoteHttp { .. } | Error::RemoteDecode { .. } | Error::RemoteCall { .. }
        )
    }

    /// Whether the remote call failed on a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::RemoteCall { source } if source.is_timeout())
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
