//! Per-user CSC overrides
//!
//! Customers adjust the status of a CSC and the quantity they claim for each
//! product. Those adjustments are kept per user, apart from the catalog, and
//! merged over it when records are displayed.
//!
//! - `CscOverride` - adjustments for one CSC
//! - `UserCscs` - all adjustments of one user, keyed by CSC reference
//! - `OverrideStore` - file-based persistence keyed by user

mod store;
mod types;

pub use store::OverrideStore;
pub use types::{CscOverride, UserCscs};
