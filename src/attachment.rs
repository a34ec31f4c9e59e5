//! The optional image attached to the next outgoing question.
//!
//! Validation runs before a request is ever constructed: a rejected file
//! never reaches the answering endpoint and leaves no pending attachment
//! behind.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("'{file_name}' is not an image (reported type {mime})")]
    NotAnImage { file_name: String, mime: String },
    #[error("'{file_name}' is {size} bytes; image attachments are limited to 5 MB")]
    TooLarge { file_name: String, size: usize },
}

/// A validated image waiting to ride along with the next question. `encoded`
/// is plain standard base64 of the raw bytes, with no data-URL prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAttachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub encoded: String,
}

impl PendingAttachment {
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let mime = mime.into();

        if !mime.starts_with("image/") {
            return Err(AttachmentError::NotAnImage { file_name, mime });
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                file_name,
                size: bytes.len(),
            });
        }

        let encoded = STANDARD.encode(&bytes);
        Ok(Self {
            file_name,
            mime,
            bytes,
            encoded,
        })
    }

    /// A data URL for previewing the attachment before it is sent. The
    /// request body always carries the bare `encoded` form instead.
    pub fn preview_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }
}

/// Best-effort MIME type from a file extension, for platforms where the file
/// picker only hands back a path.
pub fn mime_for_path(path: &str) -> &'static str {
    let extension = path
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
