//! Attachment types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions accepted by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif"];

/// MIME types accepted by default
pub const DEFAULT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
];

/// Public path under which stored attachments are served
pub const DEFAULT_WEB_PREFIX: &str = "/uploads/csc";

/// Which files are accepted and where they go (`attachments:` config section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentPolicy {
    /// Directory stored files are moved into
    pub upload_dir: PathBuf,

    /// Public path prefix of stored files
    pub web_prefix: String,

    /// Lowercase extensions without the dot
    pub allowed_extensions: Vec<String>,

    /// Lowercase MIME types
    pub allowed_mime_types: Vec<String>,

    /// Maximum size in bytes
    pub max_file_size: u64,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads/csc"),
            web_prefix: DEFAULT_WEB_PREFIX.to_string(),
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            allowed_mime_types: DEFAULT_MIME_TYPES.iter().map(|m| (*m).to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Record of an accepted attachment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentMeta {
    /// Name as sent by the customer
    pub original_name: String,

    /// Sanitized unique name it is stored under
    pub filename: String,

    /// Size in bytes
    pub size: u64,

    pub mime_type: String,

    /// Location inside `upload_dir`
    pub path: PathBuf,

    /// Public path
    pub web_path: String,

    pub uploaded_at: DateTime<Local>,
}
