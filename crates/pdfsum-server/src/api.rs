//! API handlers for the pdfsum server
//!
//! Provides REST endpoints for:
//! - PDF summarization
//! - Health checks

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Serialize;
use tracing::{debug, info};

use pdfsum_core::{PipelineObserver, ProgressEvent, SummarizeRequest, SummarizeResponse};

use crate::AppState;
use crate::error::ServerError;

/// File name used in logs when the client sends none.
const DEFAULT_FILE_NAME: &str = "upload.pdf";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdfsum-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Logs pipeline progress for one request.
struct RequestLog<'a> {
    file_name: &'a str,
}

impl PipelineObserver for RequestLog<'_> {
    fn on_progress(&self, event: &ProgressEvent) {
        debug!("{}: {}", self.file_name, event);
    }
}

/// Handler: POST /api/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ServerError> {
    let Json(req) = payload?;

    let file_name = req.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME);
    info!(
        "Summarize request: file={}, payload={} bytes",
        file_name,
        req.pdf_data.as_ref().map(String::len).unwrap_or(0)
    );

    let outcome = state
        .pipeline
        .run_base64(req.pdf_data.as_deref(), file_name, &RequestLog { file_name })
        .await?;

    info!(
        "Summarized {}: {}/{} pages, {} chars sent",
        outcome.file_name(),
        outcome.pages_processed(),
        outcome.total_pages(),
        outcome.chars_sent()
    );

    Ok(Json(SummarizeResponse {
        summary: outcome.into_summary(),
    }))
}
