//! Client for a pdfsum server's `/api/summarize` endpoint.

use std::time::Duration;

use tracing::debug;

use crate::error::{PdfsumError, UpstreamError};
use crate::models::api::SummarizeRequest;
use crate::summarize::ServerSummary;

/// Sends PDFs to the server boundary, which holds the upstream credential.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    url: String,
}

impl ProxyClient {
    /// Create a client for the server at `server_url`.
    pub fn new(server_url: &str, timeout_secs: u64) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}/api/summarize", server_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the summarize endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upload a PDF and return the server's summary.
    pub async fn summarize_pdf(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<ServerSummary, PdfsumError> {
        debug!("Posting {} ({} bytes) to {}", file_name, bytes.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&SummarizeRequest::from_bytes(bytes, file_name))
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        ServerSummary::from_reply(file_name, status.as_u16(), &body)
    }
}
