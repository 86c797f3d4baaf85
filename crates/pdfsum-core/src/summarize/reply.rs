//! Replies from a pdfsum server's summarize endpoint.

use serde::Serialize;

use crate::error::{PdfsumError, Result, UpstreamError};
use crate::export::{ExportArtifact, export_summary};
use crate::models::api::{ErrorResponse, SummarizeResponse};
use crate::models::config::ExportConfig;

/// A summary returned by a pdfsum server.
///
/// Only a success reply produces one, so client flows can export it without
/// re-checking the request outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSummary {
    file_name: String,
    summary: String,
}

impl ServerSummary {
    /// Read the reply to a summarize request for `file_name`.
    ///
    /// Non-2xx statuses become [`PdfsumError::Server`] with the server's
    /// `error` message, or a generic one when the body has none.
    pub fn from_reply(file_name: &str, status: u16, body: &[u8]) -> Result<Self> {
        if (200..300).contains(&status) {
            let parsed: SummarizeResponse = serde_json::from_slice(body)
                .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
            return Ok(Self {
                file_name: file_name.to_string(),
                summary: parsed.summary,
            });
        }

        let message = serde_json::from_slice::<ErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("server answered {}", status));

        Err(PdfsumError::Server { status, message })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Export this summary as a workbook.
    pub fn export(&self, config: &ExportConfig) -> Result<ExportArtifact> {
        Ok(export_summary(&self.summary, &self.file_name, config)?)
    }
}
