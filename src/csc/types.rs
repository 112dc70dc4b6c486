//! CSC record types
//!
//! A CSC (publisher compensation) has a validity window, a client status and
//! a list of compensated products. Records arrive keyed by reference, both
//! from the Commando `cscliste` action and from the local data file:
//!
//! ```json
//! { "CSC2024-001": {
//!     "Datedebut": "20240101", "DateFin": "20241231",
//!     "statutClient": "Ouverte",
//!     "tabproduits": {
//!       "9782070360024": { "libprod": "...", "prixAvant": 12.5,
//!                          "prixApres": 10.0, "qteClient": 3 } } } }
//! ```

use crate::error::{Error, Result};
use crate::types::{JsonValue, SortDirection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Status label for an open CSC
pub const STATUS_OPEN: &str = "Ouverte";
/// Status label for a closed CSC
pub const STATUS_CLOSED: &str = "Clôturée";
/// Status label for a CSC being processed
pub const STATUS_IN_PROGRESS: &str = "En cours";

/// Status labels offered for filtering
pub const KNOWN_STATUSES: [&str; 3] = [STATUS_OPEN, STATUS_CLOSED, STATUS_IN_PROGRESS];

const DATE_FORMAT: &str = "%Y%m%d";

// ============================================================================
// Records
// ============================================================================

/// A compensated product within a CSC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CscProduct {
    /// Product reference (usually an EAN)
    pub reference: String,
    /// Product label
    pub label: String,
    /// Price before compensation
    pub price_before: Option<f64>,
    /// Price after compensation
    pub price_after: Option<f64>,
    /// Quantity claimed by the client
    pub client_quantity: u32,
}

/// A publisher compensation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Csc {
    pub reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    /// Products in source order
    pub products: Vec<CscProduct>,
}

impl Csc {
    /// Decode one record from its wire form
    pub fn from_value(reference: &str, value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::invalid_csc(reference, "expected an object"))?;

        let start_date = parse_date(reference, obj.get("Datedebut"), "Datedebut")?;
        let end_date = parse_date(reference, obj.get("DateFin"), "DateFin")?;
        let status = obj
            .get("statutClient")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();

        let products = match obj.get("tabproduits") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Object(map)) => map
                .iter()
                .map(|(product_ref, p)| CscProduct::from_value(reference, product_ref, p))
                .collect::<Result<Vec<_>>>()?,
            // Products keyed 0..n come through as a list
            Some(JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, p)| CscProduct::from_value(reference, &i.to_string(), p))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(Error::invalid_csc(
                    reference,
                    "'tabproduits' must be an object",
                ))
            }
        };

        Ok(Self {
            reference: reference.to_string(),
            start_date,
            end_date,
            status,
            products,
        })
    }

    /// Encode back to the wire form
    pub fn to_value(&self) -> JsonValue {
        let products: serde_json::Map<String, JsonValue> = self
            .products
            .iter()
            .map(|p| {
                (
                    p.reference.clone(),
                    serde_json::json!({
                        "libprod": p.label,
                        "prixAvant": p.price_before,
                        "prixApres": p.price_after,
                        "qteClient": p.client_quantity,
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "Datedebut": self.start_date.format(DATE_FORMAT).to_string(),
            "DateFin": self.end_date.format(DATE_FORMAT).to_string(),
            "statutClient": self.status,
            "tabproduits": products,
        })
    }

    /// Product by reference
    pub fn product(&self, reference: &str) -> Option<&CscProduct> {
        self.products.iter().find(|p| p.reference == reference)
    }

    /// Whether any product reference contains `needle`, ignoring case
    pub fn has_product_matching(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.products
            .iter()
            .any(|p| p.reference.to_lowercase().contains(&needle))
    }

    /// Summary row for listings
    pub fn summary(&self) -> CscSummary {
        CscSummary {
            reference: self.reference.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.clone(),
            product_count: self.products.len(),
        }
    }
}

impl CscProduct {
    fn from_value(csc_ref: &str, reference: &str, value: &JsonValue) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::invalid_csc(csc_ref, format!("product '{reference}' must be an object"))
        })?;

        let client_quantity = match obj.get("qteClient") {
            None | Some(JsonValue::Null) => 0,
            Some(v) => number_or_string(v)
                .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
                .map(|n| n as u32)
                .ok_or_else(|| {
                    Error::invalid_csc(
                        csc_ref,
                        format!("product '{reference}' has an invalid qteClient: {v}"),
                    )
                })?,
        };

        Ok(Self {
            reference: reference.to_string(),
            label: obj
                .get("libprod")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string(),
            price_before: obj.get("prixAvant").and_then(number_or_string),
            price_after: obj.get("prixApres").and_then(number_or_string),
            client_quantity,
        })
    }
}

/// Listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CscSummary {
    pub reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub product_count: usize,
}

fn parse_date(reference: &str, value: Option<&JsonValue>, field: &str) -> Result<NaiveDate> {
    let raw = value
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::invalid_csc(reference, format!("missing '{field}'")))?;

    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        Error::invalid_csc(
            reference,
            format!("'{field}' must be YYYYMMDD, got '{raw}'"),
        )
    })
}

/// Prices and quantities come as numbers or numeric strings
fn number_or_string(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Filtering & Sorting
// ============================================================================

/// Listing filter; empty values mean "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CscFilter {
    /// Exact status label
    pub status: Option<String>,
    /// Case-insensitive substring of any product reference
    pub product_ref: Option<String>,
}

impl CscFilter {
    /// Filter on status
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filter on product reference
    #[must_use]
    pub fn product_ref(mut self, needle: impl Into<String>) -> Self {
        self.product_ref = Some(needle.into());
        self
    }

    /// Whether a record passes the filter
    pub fn matches(&self, csc: &Csc) -> bool {
        if let Some(status) = non_empty(self.status.as_deref()) {
            if csc.status != status {
                return false;
            }
        }
        if let Some(needle) = non_empty(self.product_ref.as_deref()) {
            if !csc.has_product_matching(needle) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Column to sort listings by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Reference,
    #[default]
    StartDate,
    EndDate,
    Status,
}

impl SortField {
    fn compare(self, a: &Csc, b: &Csc) -> Ordering {
        match self {
            SortField::Reference => a.reference.cmp(&b.reference),
            SortField::StartDate => a.start_date.cmp(&b.start_date),
            SortField::EndDate => a.end_date.cmp(&b.end_date),
            SortField::Status => a.status.cmp(&b.status),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Reference => "reference",
            SortField::StartDate => "dateDebut",
            SortField::EndDate => "dateFin",
            SortField::Status => "statut",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reference" => Ok(SortField::Reference),
            "dateDebut" | "start_date" => Ok(SortField::StartDate),
            "dateFin" | "end_date" => Ok(SortField::EndDate),
            "statut" | "status" => Ok(SortField::Status),
            other => Err(Error::invalid_value(
                "sort",
                format!("unknown sort column '{other}'"),
            )),
        }
    }
}

/// Sort column and direction; defaults to start date ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CscSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl CscSort {
    /// Create a sort
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Stable sort in place
    pub fn apply(self, cscs: &mut [&Csc]) {
        cscs.sort_by(|a, b| match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        });
    }
}
