//! Override store implementation
//!
//! Provides file-based override persistence with atomic writes.

use super::types::{CscOverride, UserCscs};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

type Users = BTreeMap<String, UserCscs>;

/// Store for per-user CSC overrides, keyed by user id
#[derive(Debug, Clone)]
pub struct OverrideStore {
    /// Path to the store file; empty in memory mode
    path: PathBuf,
    /// Current overrides (cached)
    users: Arc<RwLock<Users>>,
    /// Serializes snapshot, temp write and rename across clones
    save_lock: Arc<Mutex<()>>,
}

impl OverrideStore {
    /// Create an empty store persisted to `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            users: Arc::new(RwLock::new(Users::new())),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create an in-memory store (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            users: Arc::new(RwLock::new(Users::new())),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create a store from a file, loading existing overrides if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let users = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::store(format!("Failed to read store file: {e}")))?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::store(format!("Failed to parse store file: {e}")))?
        } else {
            Users::new()
        };

        Ok(Self {
            path,
            users: Arc::new(RwLock::new(users)),
            save_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Whether this store is memory only
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload overrides from file
    pub async fn load(&self) -> Result<()> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::store(format!("Failed to read store file: {e}")))?;
        let loaded: Users = serde_json::from_str(&contents)
            .map_err(|e| Error::store(format!("Failed to parse store file: {e}")))?;

        *self.users.write().await = loaded;
        Ok(())
    }

    /// Save current overrides to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        // Snapshot under the save lock so the last rename carries the latest state
        let _guard = self.save_lock.lock().await;
        let contents = self.to_json_pretty().await?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::store(format!("Failed to create store directory: {e}")))?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::store(format!("Failed to write store file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::store(format!("Failed to rename store file: {e}")))?;

        debug!("Saved CSC overrides to {}", self.path.display());
        Ok(())
    }

    /// Export overrides as pretty-printed JSON
    pub async fn to_json_pretty(&self) -> Result<String> {
        let users = self.users.read().await;
        serde_json::to_string_pretty(&*users)
            .map_err(|e| Error::store(format!("Failed to serialize overrides: {e}")))
    }

    /// Users with stored overrides
    pub async fn users(&self) -> Vec<String> {
        self.users.read().await.keys().cloned().collect()
    }

    /// Overrides of a user, if any were ever stored
    pub async fn get_user_csc(&self, user: &str) -> Option<UserCscs> {
        self.users.read().await.get(user).cloned()
    }

    /// Create or replace all overrides of a user, then save
    pub async fn update_user_csc(&self, user: &str, cscs: UserCscs) -> Result<UserCscs> {
        self.users
            .write()
            .await
            .insert(user.to_string(), cscs.clone());
        self.save().await?;
        Ok(cscs)
    }

    /// Set the claimed quantity of one product, then save
    pub async fn set_quantity(
        &self,
        user: &str,
        reference: &str,
        product: &str,
        quantity: u32,
    ) -> Result<()> {
        self.modify(user, reference, |csc| {
            csc.quantities.insert(product.to_string(), quantity);
        })
        .await
    }

    /// Set the status of one CSC, then save
    pub async fn set_status(&self, user: &str, reference: &str, status: &str) -> Result<()> {
        let status = status.trim();
        if status.is_empty() {
            return Err(Error::invalid_value("status", "must not be empty"));
        }
        self.modify(user, reference, |csc| {
            csc.status = Some(status.to_string());
        })
        .await
    }

    /// Drop a user's override for one CSC, then save. Returns whether one existed.
    pub async fn remove_csc(&self, user: &str, reference: &str) -> Result<bool> {
        let removed = {
            let mut users = self.users.write().await;
            users
                .get_mut(user)
                .and_then(|cscs| cscs.remove(reference))
                .is_some()
        };

        if removed {
            self.save().await?;
        }
        Ok(removed)
    }

    async fn modify<F>(&self, user: &str, reference: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut CscOverride),
    {
        {
            let mut users = self.users.write().await;
            let cscs = users.entry(user.to_string()).or_default();
            f(cscs.entry(reference));
        }
        self.save().await
    }
}
