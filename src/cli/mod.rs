//! CLI module
//!
//! Command-line interface for the Commando webservice and CSC records.
//!
//! # Commands
//!
//! - `csc-list`, `backorders`, `stock`, `pricing` - call a Commando action
//! - `url` - print a signed URL without sending it
//! - `list`, `detail` - CSC records with the user's overrides applied
//! - `set-quantity`, `set-status` - record a user's overrides

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
