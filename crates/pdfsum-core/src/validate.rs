//! Upload validation and base64 payload handling.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::InputError;

/// MIME type accepted for uploads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Bytes allowed before the signature (some producers emit junk first).
const SIGNATURE_SEARCH_WINDOW: usize = 1024;

/// A file handed to the pipeline by a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name.
    pub file_name: String,
    /// Declared MIME type, if the client supplied one.
    pub content_type: Option<String>,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }
}

/// Options for [`validate_upload`].
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Check the `%PDF-` signature instead of trusting the declared type alone.
    pub require_signature: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            require_signature: true,
        }
    }
}

/// Reject uploads that are not PDFs.
///
/// A declared type, when present, must be `application/pdf`. Uploads without
/// a declared type (the server flow) are judged by their bytes.
pub fn validate_upload(upload: &Upload, options: &ValidationOptions) -> Result<(), InputError> {
    if let Some(content_type) = &upload.content_type {
        if !is_pdf_content_type(content_type) {
            return Err(InputError::NotPdf {
                file_name: upload.file_name.clone(),
                content_type: content_type.clone(),
            });
        }
    }

    if upload.bytes.is_empty() {
        return Err(InputError::Empty(upload.file_name.clone()));
    }

    if options.require_signature && !has_pdf_signature(&upload.bytes) {
        return Err(InputError::BadSignature(upload.file_name.clone()));
    }

    debug!(
        "Accepted upload '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );
    Ok(())
}

/// Whether a declared MIME type names a PDF.
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Whether the bytes carry a PDF header near the start.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_SEARCH_WINDOW)];
    window
        .windows(PDF_SIGNATURE.len())
        .any(|w| w == PDF_SIGNATURE)
}

/// Declared content type for a local file, derived from its extension.
pub fn content_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => PDF_CONTENT_TYPE.to_string(),
        "" => "application/octet-stream".to_string(),
        other => format!("application/x-{}", other),
    }
}

/// Decode a base64 PDF payload.
///
/// Accepts an optional `data:...;base64,` prefix and embedded whitespace.
pub fn decode_pdf_payload(payload: &str) -> Result<Vec<u8>, InputError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingPayload);
    }

    let data = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| InputError::InvalidBase64("data URL without payload".to_string()))?,
        None => trimmed,
    };

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| InputError::InvalidBase64(e.to_string()))
}

/// Encode PDF bytes for a request body.
pub fn encode_pdf_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
