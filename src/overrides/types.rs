//! Override types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Adjustments a user made to one CSC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CscOverride {
    /// Replacement status label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Claimed quantity per product reference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quantities: BTreeMap<String, u32>,
}

impl CscOverride {
    /// Whether this override changes nothing
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.quantities.is_empty()
    }
}

/// All overrides of one user, keyed by CSC reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserCscs {
    cscs: BTreeMap<String, CscOverride>,
}

impl UserCscs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the override for a CSC
    pub fn add(&mut self, reference: impl Into<String>, csc: CscOverride) -> &mut Self {
        self.cscs.insert(reference.into(), csc);
        self
    }

    /// Remove the override for a CSC, returning it
    pub fn remove(&mut self, reference: &str) -> Option<CscOverride> {
        self.cscs.remove(reference)
    }

    pub fn has(&self, reference: &str) -> bool {
        self.cscs.contains_key(reference)
    }

    pub fn get(&self, reference: &str) -> Option<&CscOverride> {
        self.cscs.get(reference)
    }

    /// Override for a CSC, created empty if missing
    pub fn entry(&mut self, reference: &str) -> &mut CscOverride {
        self.cscs.entry(reference.to_string()).or_default()
    }

    /// CSC references with an override
    pub fn references(&self) -> Vec<&str> {
        self.cscs.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.cscs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cscs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CscOverride)> {
        self.cscs.iter().map(|(k, v)| (k.as_str(), v))
    }
}
