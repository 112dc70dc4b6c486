//! CSC catalog: decoding, listing and override merging

use super::types::{Csc, CscFilter, CscSort, CscSummary};
use crate::error::{Error, Result};
use crate::overrides::UserCscs;
use crate::types::{JsonObject, JsonValue};
use std::path::Path;
use tracing::{debug, warn};

/// The set of CSC records available to one client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cscs: Vec<Csc>,
}

impl Catalog {
    /// Create a catalog from records
    pub fn new(cscs: Vec<Csc>) -> Self {
        Self { cscs }
    }

    /// Decode the reference-keyed wire form.
    ///
    /// An empty list is accepted as an empty catalog. Any invalid record
    /// fails the whole catalog.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let cscs = records(value)?
            .into_iter()
            .map(|(reference, csc)| Csc::from_value(reference, csc))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cscs })
    }

    /// Decode the wire form, skipping invalid records with a warning
    pub fn from_value_lenient(value: &JsonValue) -> Result<Self> {
        let cscs = records(value)?
            .into_iter()
            .filter_map(|(reference, csc)| match Csc::from_value(reference, csc) {
                Ok(csc) => Some(csc),
                Err(e) => {
                    warn!("Skipping CSC record: {}", e);
                    None
                }
            })
            .collect();
        Ok(Self { cscs })
    }

    /// Decode a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load a JSON data file; invalid records are skipped
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        let value: JsonValue = serde_json::from_str(&content)?;
        let catalog = Self::from_value_lenient(&value)?;
        debug!("Loaded {} CSC from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Encode back to the wire form
    pub fn to_value(&self) -> JsonValue {
        let map: JsonObject = self
            .cscs
            .iter()
            .map(|c| (c.reference.clone(), c.to_value()))
            .collect();
        JsonValue::Object(map)
    }

    pub fn len(&self) -> usize {
        self.cscs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cscs.is_empty()
    }

    /// Records in source order
    pub fn iter(&self) -> impl Iterator<Item = &Csc> {
        self.cscs.iter()
    }

    /// Record by reference
    pub fn get(&self, reference: &str) -> Option<&Csc> {
        self.cscs.iter().find(|c| c.reference == reference)
    }

    /// Record by reference, or `CscNotFound`
    pub fn detail(&self, reference: &str) -> Result<&Csc> {
        self.get(reference)
            .ok_or_else(|| Error::csc_not_found(reference))
    }

    /// Filtered and sorted records
    pub fn select(&self, filter: &CscFilter, sort: CscSort) -> Vec<&Csc> {
        let mut selected: Vec<&Csc> = self.cscs.iter().filter(|c| filter.matches(c)).collect();
        sort.apply(&mut selected);
        selected
    }

    /// Filtered and sorted summary rows
    pub fn list(&self, filter: &CscFilter, sort: CscSort) -> Vec<CscSummary> {
        self.select(filter, sort)
            .into_iter()
            .map(Csc::summary)
            .collect()
    }

    /// Merge a user's overrides into the catalog.
    ///
    /// An override status replaces the record status and an override
    /// quantity replaces the product's client quantity. Overrides for
    /// unknown records or products are ignored. Returns the number of
    /// values changed.
    pub fn apply_overrides(&mut self, overrides: &UserCscs) -> usize {
        let mut applied = 0;
        for csc in &mut self.cscs {
            let Some(over) = overrides.get(&csc.reference) else {
                continue;
            };

            if let Some(status) = &over.status {
                csc.status.clone_from(status);
                applied += 1;
            }

            for product in &mut csc.products {
                if let Some(quantity) = over.quantities.get(&product.reference) {
                    product.client_quantity = *quantity;
                    applied += 1;
                }
            }
        }
        applied
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}

/// Records of the wire form keyed by reference
fn records(value: &JsonValue) -> Result<Vec<(&str, &JsonValue)>> {
    match value {
        JsonValue::Object(map) => Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        JsonValue::Array(items) if items.is_empty() => Ok(Vec::new()),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(Error::invalid_csc(
            "<catalog>",
            format!("expected an object keyed by reference, got {}", kind(other)),
        )),
    }
}
