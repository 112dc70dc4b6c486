//! Where CSC catalogs come from
//!
//! The webservice is the primary source. When it fails, the local JSON data
//! file stands in so the customer still sees their records.

use super::catalog::Catalog;
use crate::error::{Error, Result};
use crate::http::CommandoClient;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A source of CSC catalogs
#[async_trait]
pub trait CscSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch the catalog for a client
    async fn fetch(&self, client_code: &str) -> Result<Catalog>;
}

/// Catalog from the Commando `cscliste` action
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: CommandoClient,
}

impl ApiSource {
    pub fn new(client: CommandoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CscSource for ApiSource {
    fn name(&self) -> &'static str {
        "commando"
    }

    async fn fetch(&self, client_code: &str) -> Result<Catalog> {
        let value = self.client.get_csc_list(client_code).await?;
        // A body that is JSON but not a catalog is still a bad response
        Catalog::from_value(&value).map_err(|e| Error::remote_decode(e.to_string()))
    }
}

/// Catalog from a local JSON data file; the client code is not used
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CscSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, _client_code: &str) -> Result<Catalog> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Catalog::load(path))
            .await
            .map_err(|e| Error::Other(format!("Catalog loader task failed: {e}")))?
    }
}

/// Tries `primary`, then `fallback` when the primary fails remotely.
///
/// Errors that are not remote failures (bad config, reserved parameters)
/// are returned as is.
pub struct FallbackSource {
    primary: Box<dyn CscSource>,
    fallback: Box<dyn CscSource>,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn CscSource>, fallback: Box<dyn CscSource>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl CscSource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn fetch(&self, client_code: &str) -> Result<Catalog> {
        match self.primary.fetch(client_code).await {
            Ok(catalog) => Ok(catalog),
            Err(e) if e.is_remote() => {
                warn!(
                    "CSC source '{}' failed ({}), using '{}'",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                self.fallback.fetch(client_code).await
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSource")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
