//! # Commando CSC
//!
//! Client for the Commando webservice and the customer-facing handling of
//! CSC (publisher compensation) records.
//!
//! ## Features
//!
//! - **Signed requests**: `ts` + MD5 `token` computed over the parameters in
//!   the exact order they are sent
//! - **Commando actions**: CSC list, backorders, stock availability, pricing
//! - **CSC catalog**: filtering by status or product reference, sorting,
//!   per-user overrides of status and claimed quantities
//! - **Attachments**: accepted file types, size limit, sanitized unique names
//! - **Fallback**: local JSON data when the webservice is unavailable
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use commando_csc::{ClientConfig, CommandoClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::new("https://commando.example.com/ws/api.php", "secret")?;
//!     let client = CommandoClient::new(config)?;
//!
//!     let cscs = client.get_csc_list("00318945").await?;
//!     let stock = client.get_stock_availability("9782070360024", true).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          CLI                             │
//! └──────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴──────────┐   ┌───────────────┴───────────┐
//! │   CSC                   │   │   Overrides               │
//! │   Catalog, filter, sort │◄──┤   per-user status / qty   │
//! │   Api / File / Fallback │   │   JSON file store         │
//! └──────────────┬──────────┘   └───────────────────────────┘
//! ┌──────────────┴──────────┐
//! │   HTTP (CommandoClient) │
//! ├─────────────────────────┤
//! │   Auth (MD5 signer)     │
//! └─────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request signing
pub mod auth;

/// Signed HTTP client for the Commando webservice
pub mod http;

/// Client and application configuration
pub mod config;

/// CSC records, catalog and sources
pub mod csc;

/// Per-user CSC overrides
pub mod overrides;

/// Attachment policy and stored names
pub mod attachments;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{QueryParams, RequestSigner, SignedQuery, Timestamp};
pub use config::{AppConfig, ClientConfig};
pub use error::{Error, Result};
pub use http::{Action, CommandoClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
