//! pdfsum server
//!
//! Accepts base64-encoded PDFs, extracts their text, forwards a truncated
//! excerpt to the summarization endpoint and returns the summary:
//!
//! - `POST /api/summarize` with `{ "pdfData": "<base64>" }`
//! - `GET /health`
//!
//! The upstream credential is read from `XAI_API_KEY` and never leaves this
//! process.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pdfsum_core::models::config::API_KEY_ENV;
use pdfsum_core::{ApiKey, HttpSummarizer, PdfsumConfig, SummaryPipeline};

mod api;
mod error;
#[cfg(test)]
mod tests;

use api::{handle_health, handle_summarize};

/// Command-line arguments for the pdfsum server
#[derive(Parser, Debug)]
#[command(name = "pdfsum-server")]
#[command(about = "PDF summarization server")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Summarization endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Maximum pages to extract per document (0 = all)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Load the config file (if any) and apply command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<PdfsumConfig> {
        let mut config = match &self.config {
            Some(path) => PdfsumConfig::from_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => PdfsumConfig::default(),
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.summarizer.endpoint = endpoint.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.pdf.max_pages = max_pages;
        }

        Ok(config)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SummaryPipeline<HttpSummarizer>>,
}

impl AppState {
    pub fn new(config: &PdfsumConfig, api_key: ApiKey) -> anyhow::Result<Self> {
        let summarizer = HttpSummarizer::new(&config.summarizer, api_key)?;
        Ok(Self {
            pipeline: Arc::new(SummaryPipeline::from_config(summarizer, config)),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState, body_limit: usize) -> Router {
    // The browser client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/summarize", post(handle_summarize))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.resolve_config()?;
    let api_key = ApiKey::from_env(API_KEY_ENV)
        .with_context(|| format!("{} is not set", API_KEY_ENV))?;

    let state = AppState::new(&config, api_key)?;
    let app = router(state, config.server.body_limit_bytes);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Summarization endpoint: {}", config.summarizer.endpoint);
    info!(
        "Page limit: {}, character budget: {}",
        config.pdf.max_pages, config.summarizer.truncate_chars
    );

    axum::serve(listener, app).await?;

    Ok(())
}
