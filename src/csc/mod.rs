//! CSC (publisher compensation) records
//!
//! - `Csc` / `CscProduct` - decoded records
//! - `Catalog` - the records for one client, with filtering, sorting and
//!   per-user override merging
//! - `CscSource` - webservice or local file, with fallback between them

mod catalog;
mod source;
mod types;

pub use catalog::Catalog;
pub use source::{ApiSource, CscSource, FallbackSource, FileSource};
pub use types::{
    Csc, CscFilter, CscProduct, CscSort, CscSummary, SortField, KNOWN_STATUSES, STATUS_CLOSED,
    STATUS_IN_PROGRESS, STATUS_OPEN,
};
