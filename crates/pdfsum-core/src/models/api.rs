//! JSON bodies exchanged between clients, the server and the upstream endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/summarize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Base64-encoded PDF bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_data: Option<String>,

    /// Original file name, used for logging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl SummarizeRequest {
    /// Build a request from raw PDF bytes.
    pub fn from_bytes(bytes: &[u8], file_name: impl Into<String>) -> Self {
        Self {
            pdf_data: Some(crate::validate::encode_pdf_payload(bytes)),
            file_name: Some(file_name.into()),
        }
    }
}

/// Successful response of `POST /api/summarize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Error response of every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body sent to the upstream summarization endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest<'a> {
    pub text: &'a str,
    pub max_length: u32,
}
