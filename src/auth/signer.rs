//! MD5 token signer for Commando requests

use super::types::{QueryParams, SignedQuery, Timestamp};
use crate::error::{Error, Result};
use md5::{Digest, Md5};

/// Signs Commando requests with the shared secret.
///
/// The secret is only ever used as the prefix of the hashed string; it is
/// never sent and never printed by `Debug`.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    /// Create a new signer
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Build the string fed to MD5: `secret k1=v1 ... kn=vn ts=<timestamp>`
    /// with no separators between pairs.
    pub fn canonical(&self, params: &QueryParams, timestamp: &Timestamp) -> String {
        let mut canonical = self.secret.clone();
        for (key, value) in params.iter() {
            canonical.push_str(key);
            canonical.push('=');
            canonical.push_str(value);
        }
        canonical.push_str("ts=");
        canonical.push_str(timestamp.as_str());
        canonical
    }

    /// Lowercase hex MD5 of the canonical string
    pub fn token(&self, params: &QueryParams, timestamp: &Timestamp) -> String {
        let canonical = self.canonical(params, timestamp);
        hex::encode(Md5::digest(canonical.as_bytes()))
    }

    /// Sign parameters at the given instant.
    ///
    /// Fails if the caller already supplied `ts` or `token`.
    pub fn sign(&self, params: QueryParams, timestamp: Timestamp) -> Result<SignedQuery> {
        if let Some(key) = params.reserved_key() {
            return Err(Error::ReservedParameter {
                key: key.to_string(),
            });
        }

        let token = self.token(&params, &timestamp);
        Ok(SignedQuery::new(params, timestamp, token))
    }

    /// Sign parameters at the current local time
    pub fn sign_now(&self, params: QueryParams) -> Result<SignedQuery> {
        self.sign(params, Timestamp::now())
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"***")
            .finish()
    }
}
