//! HTTP client module
//!
//! Signed GET client for the Commando webservice.
//!
//! # Features
//!
//! - **Request signing**: every call carries `ts` and an MD5 `token`
//! - **Fixed parameter order**: the four Commando actions build their
//!   parameters in the order the remote signature check expects
//! - **Error classification**: non-200 status, undecodable body and
//!   transport failures surface as distinct error variants
//!
//! No retries or rate limiting: a failed call is returned to the caller.

mod actions;
mod client;

pub use actions::{join_references, Action};
pub use client::CommandoClient;

#[cfg(test)]
mod tests;
