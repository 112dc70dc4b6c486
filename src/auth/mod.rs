//! Authentication module
//!
//! Commando requests are authenticated with a timestamp and an MD5 token:
//!
//! ```text
//! token = md5(secret + k1=v1 + k2=v2 + ... + kn=vn + ts=YYYYMMDDHHMMSS)
//! ```
//!
//! Parameters are hashed in the exact order the caller supplied them, so
//! they are carried as an ordered [`QueryParams`] list rather than a map.
//! The `RequestSigner` produces a [`SignedQuery`] holding the caller's
//! parameters followed by `ts` and `token`.

mod signer;
mod types;

pub use signer::RequestSigner;
pub use types::{QueryParams, SignedQuery, Timestamp, RESERVED_KEYS};

#[cfg(test)]
mod tests;
