//! Signing input and output types
//!
//! These types carry request parameters through signing without ever
//! reordering them.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use url::Url;

/// Query keys appended by the signer; callers may not supply them
pub const RESERVED_KEYS: [&str; 2] = ["ts", "token"];

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

// ============================================================================
// Timestamp
// ============================================================================

/// Request timestamp in `YYYYMMDDHHMMSS` form (local time)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current local time, second granularity
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Parse and validate a 14-digit timestamp
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidTimestamp {
            value: value.to_string(),
        };

        if value.len() != 14 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| invalid())?;

        Ok(Self(value.to_string()))
    }

    /// Timestamp for a given date-time
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    /// The timestamp string as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Ordered query parameters.
///
/// Order is part of the signature input, so pairs are kept exactly as
/// pushed. Duplicate keys are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter (builder style)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter only when `flag` is set
    #[must_use]
    pub fn with_if(mut self, flag: bool, key: impl Into<String>, value: impl Into<String>) -> Self {
        if flag {
            self.push(key, value);
        }
        self
    }

    /// Append a parameter
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Iterate over pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the first pair with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First reserved key present, if any
    pub fn reserved_key(&self) -> Option<&str> {
        self.iter()
            .map(|(k, _)| k)
            .find(|k| RESERVED_KEYS.iter().any(|reserved| reserved == k))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for QueryParams {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

// ============================================================================
// Signed Query
// ============================================================================

/// Caller parameters followed by `ts` and `token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    params: QueryParams,
    timestamp: Timestamp,
    token: String,
}

impl SignedQuery {
    pub(crate) fn new(params: QueryParams, timestamp: Timestamp, token: String) -> Self {
        Self {
            params,
            timestamp,
            token,
        }
    }

    /// The caller's parameters
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Timestamp used for signing and sent as `ts`
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Lowercase hex MD5 token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// All pairs in wire order: caller params, then `ts`, then `token`
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .chain([("ts", self.timestamp.as_str()), ("token", self.token.as_str())])
    }

    /// Form-urlencoded query string in wire order
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// Append this query to a base URL
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().extend_pairs(self.pairs());
        url
    }
}
