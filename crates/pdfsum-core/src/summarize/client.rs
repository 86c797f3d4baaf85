//! Client for the upstream summarization endpoint.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiKey, Summarizer};
use crate::error::UpstreamError;
use crate::models::api::UpstreamRequest;
use crate::models::config::SummarizerConfig;

/// Calls `POST <endpoint>` with `{ text, max_length }` and a bearer token.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
    max_length: u32,
    summary_field: String,
}

impl HttpSummarizer {
    /// Create a summarizer from configuration and a credential.
    pub fn new(config: &SummarizerConfig, api_key: ApiKey) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_length: config.max_length,
            summary_field: config.summary_field.clone(),
        })
    }
}

impl Summarizer for HttpSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, UpstreamError> {
        debug!(
            "Summarizing {} chars via {} (max_length={})",
            text.chars().count(),
            self.endpoint,
            self.max_length
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&UpstreamRequest {
                text,
                max_length: self.max_length,
            })
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Summarization endpoint answered {}", status);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        read_summary(&value, &self.summary_field)
    }
}

/// Pull the summary string out of a response body.
///
/// `field` is either a top-level key (`summary`) or a JSON pointer
/// (`/choices/0/text`).
pub(crate) fn read_summary(value: &Value, field: &str) -> Result<String, UpstreamError> {
    let found = if field.starts_with('/') {
        value.pointer(field)
    } else {
        value.get(field)
    };

    found
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::MissingField(field.to_string()))
}
