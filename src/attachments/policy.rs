//! Attachment validation and stored names

use super::types::{AttachmentMeta, AttachmentPolicy};
use crate::error::{Error, Result};
use chrono::{Local, Utc};
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;
use tracing::debug;

/// Chars not allowed in a stored file name
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").unwrap());

impl AttachmentPolicy {
    /// Whether `extension` (any case, no dot) is allowed
    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }

    /// Whether `mime` (any case) is allowed
    pub fn allows_mime_type(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|m| *m == mime)
    }

    /// Check a file against the policy.
    ///
    /// The MIME type must be allowed. When the name carries an extension it
    /// must be allowed too.
    pub fn validate(&self, name: &str, size: u64, mime: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::invalid_attachment(name, "file name is empty"));
        }
        if size == 0 {
            return Err(Error::invalid_attachment(name, "file is empty"));
        }
        if size > self.max_file_size {
            return Err(Error::invalid_attachment(
                name,
                format!(
                    "{size} bytes exceeds the limit of {} bytes",
                    self.max_file_size
                ),
            ));
        }
        if !self.allows_mime_type(mime) {
            return Err(Error::invalid_attachment(
                name,
                format!("type '{}' is not a PDF or an image (JPG, PNG, GIF)", mime.trim()),
            ));
        }
        if let Some(extension) = extension_of(name) {
            if !self.allows_extension(&extension) {
                return Err(Error::invalid_attachment(
                    name,
                    format!("extension '.{extension}' is not allowed"),
                ));
            }
        }
        Ok(())
    }

    /// Validate a file and compute the record it would be stored under.
    ///
    /// The stored extension follows the MIME type, not the client's name.
    pub fn describe(&self, name: &str, size: u64, mime: &str) -> Result<AttachmentMeta> {
        self.validate(name, size, mime)?;

        let mime_type = mime.trim().to_ascii_lowercase();
        let extension = extension_for_mime(&mime_type)
            .map(str::to_string)
            .or_else(|| extension_of(name))
            .unwrap_or_default();
        let filename = unique_filename(name, &extension);
        debug!("Attachment '{}' accepted as {}", name, filename);

        Ok(AttachmentMeta {
            original_name: name.to_string(),
            path: self.upload_dir.join(&filename),
            web_path: format!("{}/{}", self.web_prefix.trim_end_matches('/'), filename),
            filename,
            size,
            mime_type,
            uploaded_at: Local::now(),
        })
    }
}

/// Stored name for `original`: sanitized stem, unique suffix, own extension
pub fn safe_filename(original: &str) -> String {
    unique_filename(original, &extension_of(original).unwrap_or_default())
}

/// File stem of `original` with every char outside `[A-Za-z0-9_-]` replaced by `_`
pub fn sanitize_stem(original: &str) -> String {
    UNSAFE_CHARS
        .replace_all(split_name(original).0, "_")
        .into_owned()
}

fn unique_filename(original: &str, extension: &str) -> String {
    let stem = sanitize_stem(original);
    let suffix = unique_suffix();
    if extension.is_empty() {
        format!("{stem}_{suffix}")
    } else {
        format!("{stem}_{suffix}.{extension}")
    }
}

/// Base name split into stem and extension at the last dot
fn split_name(original: &str) -> (&str, Option<&str>) {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    match base.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (base, None),
    }
}

fn extension_of(name: &str) -> Option<String> {
    split_name(name)
        .1
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "application/pdf" => Some("pdf"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// 13 hex digits: seconds then microseconds, strictly increasing per process
fn unique_suffix() -> String {
    static LAST: AtomicU64 = AtomicU64::new(0);

    let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or_default();
    let (Ok(previous) | Err(previous)) =
        LAST.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        });
    let micros = now.max(previous + 1);

    format!("{:08x}{:05x}", micros / 1_000_000, micros % 1_000_000)
}
