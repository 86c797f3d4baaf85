//! Summarize command - send one PDF to a pdfsum server.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use pdfsum_core::models::config::PdfsumConfig;
use pdfsum_core::validate::content_type_for_path;
use pdfsum_core::{ExportArtifact, ProxyClient, ServerSummary, Upload, ValidationOptions, validate_upload};

use super::{display_name, load_config, spinner};

/// Arguments for the summarize command.
#[derive(Args)]
pub struct SummarizeArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Server base URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Write `<name>_summary.xlsx` after a successful summary
    #[arg(short, long)]
    export: bool,

    /// Directory for the exported workbook
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary
    Text,
    /// JSON object
    Json,
}

/// Result of the client flow for one file.
#[derive(Debug, Serialize)]
pub struct ClientSummary {
    #[serde(flatten)]
    pub reply: ServerSummary,
    pub processing_time_ms: u64,
}

pub async fn run(args: SummarizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(server) = args.server {
        config.client.server_url = server;
    }

    let client = ProxyClient::new(&config.client.server_url, config.client.timeout_secs)?;

    let pb = spinner();
    pb.set_message("Processing PDF...");
    let result = summarize_file(&args.input, &client, &config).await;
    pb.finish_and_clear();
    let summary = result?;

    match args.format {
        OutputFormat::Text => {
            println!("{}", style(format!("Summary of {}", summary.reply.file_name())).bold());
            println!();
            println!("{}", summary.reply.summary());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    if args.export {
        let path = write_export(&summary, &config, &args.output_dir)?;
        eprintln!("{} Exported to {}", style("✓").green(), path.display());
    }

    debug!(
        "Summarized {} in {}ms",
        summary.reply.file_name(),
        summary.processing_time_ms
    );
    Ok(())
}

/// Validate a local PDF and summarize it through the server.
///
/// Validation runs before any network call.
pub async fn summarize_file(
    path: &Path,
    client: &ProxyClient,
    config: &PdfsumConfig,
) -> anyhow::Result<ClientSummary> {
    let start = Instant::now();

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let file_name = display_name(path);
    let upload = Upload::new(
        file_name.clone(),
        Some(content_type_for_path(path)),
        fs::read(path)?,
    );
    validate_upload(
        &upload,
        &ValidationOptions {
            require_signature: config.pdf.require_pdf_signature,
        },
    )?;

    info!("Sending {} to {}", file_name, client.url());
    let reply = client.summarize_pdf(&upload.bytes, &file_name).await?;

    Ok(ClientSummary {
        reply,
        processing_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Write the workbook for a summary into `output_dir`.
pub fn write_export(
    summary: &ClientSummary,
    config: &PdfsumConfig,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let ExportArtifact { file_name, bytes } = summary.reply.export(&config.export)?;

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    fs::write(&path, bytes)?;
    debug!("Wrote workbook to {}", path.display());

    Ok(path)
}
