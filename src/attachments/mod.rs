//! CSC attachments
//!
//! Customers may join supporting documents to a CSC. This module holds the
//! acceptance policy and the stored-name scheme; moving the bytes is left to
//! the caller.
//!
//! - `AttachmentPolicy` - allowed types, size limit, target directory
//! - `AttachmentMeta` - what is recorded for an accepted file
//! - `safe_filename` - sanitized, unique stored name

mod policy;
mod types;

pub use policy::{safe_filename, sanitize_stem};
pub use types::{
    AttachmentMeta, AttachmentPolicy, DEFAULT_EXTENSIONS, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MIME_TYPES, DEFAULT_WEB_PREFIX,
};
