//! In-memory decoding of `multipart/form-data` create requests.
//!
//! Text parts become a flat name → value map. The single attachment part is
//! buffered in memory and never touches disk.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::DEFAULT_UPLOAD_MAX_BYTES;

/// Form field carrying the optional image.
pub const ATTACHMENT_FIELD: &str = "fashion_image";

/// Extra room the request body limit leaves on top of the attachment cap for
/// boundaries, part headers and the text fields.
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("unexpected file field {0:?}")]
    UnexpectedFile(String),

    #[error("malformed multipart body: {0}")]
    Malformed(#[source] MultipartError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Absent,
    Present(Vec<u8>),
}

impl Attachment {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Attachment::Absent => None,
            Attachment::Present(bytes) => Some(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUpload {
    pub fields: HashMap<String, String>,
    pub attachment: Attachment,
}

impl DecodedUpload {
    /// Removes and returns a text field.
    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UploadDecoder {
    max_bytes: usize,
}

impl Default for UploadDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_MAX_BYTES)
    }
}

impl UploadDecoder {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Limit for the whole request body, used with `DefaultBodyLimit`.
    pub fn body_limit(&self) -> usize {
        self.max_bytes.saturating_add(FORM_OVERHEAD_BYTES)
    }

    pub async fn decode(&self, mut multipart: Multipart) -> Result<DecodedUpload, DecodeError> {
        let mut fields = HashMap::new();
        let mut attachment = Attachment::Absent;

        while let Some(field) = multipart.next_field().await.map_err(|e| self.classify(e))? {
            let name = field.name().unwrap_or_default().to_string();

            // A file input left empty is sent as `filename=""`; that is no file at all.
            let is_file = matches!(field.file_name(), Some(n) if !n.is_empty());
            let is_skipped_file = field.file_name() == Some("");

            if is_file {
                if name != ATTACHMENT_FIELD || attachment != Attachment::Absent {
                    return Err(DecodeError::UnexpectedFile(name));
                }
                attachment = Attachment::Present(self.read_attachment(field).await?);
            } else if !is_skipped_file {
                let value = field.text().await.map_err(|e| self.classify(e))?;
                fields.insert(name, value);
            }
        }

        Ok(DecodedUpload { fields, attachment })
    }

    async fn read_attachment(&self, mut field: Field<'_>) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| self.classify(e))? {
            if buf.len() + chunk.len() > self.max_bytes {
                return Err(DecodeError::PayloadTooLarge {
                    limit: self.max_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }

    // The body limit layer surfaces as a multipart error carrying 413.
    fn classify(&self, err: MultipartError) -> DecodeError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            DecodeError::PayloadTooLarge {
                limit: self.max_bytes,
            }
        } else {
            DecodeError::Malformed(err)
        }
    }
}
