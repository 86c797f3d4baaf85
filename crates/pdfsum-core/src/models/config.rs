//! Configuration structures for the summarization pipeline.

use serde::{Deserialize, Serialize};

/// Default upstream summarization endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai/v1/summarize";

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "XAI_API_KEY";

/// Main configuration for pdfsum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfsumConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Upstream summarizer configuration.
    pub summarizer: SummarizerConfig,

    /// Spreadsheet export configuration.
    pub export: ExportConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Terminal client configuration.
    pub client: ClientConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages extracted by the server (0 = unlimited).
    pub max_pages: usize,

    /// Maximum pages extracted for a client-side preview (0 = unlimited).
    pub client_max_pages: usize,

    /// Number of pages extracted concurrently.
    pub concurrency: usize,

    /// Require the `%PDF-` signature in addition to the declared type.
    pub require_pdf_signature: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            client_max_pages: 5,
            concurrency: 4,
            require_pdf_signature: true,
        }
    }
}

/// Upstream summarizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Summarization endpoint URL.
    pub endpoint: String,

    /// `max_length` sent with every request.
    pub max_length: u32,

    /// Character budget for the text sent upstream.
    pub truncate_chars: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Name of the string field holding the summary in the response.
    pub summary_field: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_length: 200,
            truncate_chars: 5000,
            timeout_secs: 60,
            summary_field: "summary".to_string(),
        }
    }
}

/// Spreadsheet export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Worksheet name.
    pub sheet_name: String,

    /// Write a `Field | Value` header row.
    pub include_header: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Summary".to_string(),
            include_header: true,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Terminal client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the pdfsum server.
    pub server_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl PdfsumConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
