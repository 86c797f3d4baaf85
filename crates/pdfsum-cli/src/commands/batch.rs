//! Batch command - summarize every PDF matching a glob.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use pdfsum_core::ProxyClient;

use super::load_config;
use super::summarize::{ClientSummary, summarize_file, write_export};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Server base URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Write a workbook for each successful summary
    #[arg(short, long)]
    export: bool,

    /// Directory for exported workbooks
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    summary: Option<ClientSummary>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(server) = args.server {
        config.client.server_url = server;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let client = ProxyClient::new(&config.client.server_url, config.client.timeout_secs)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    // One request at a time
    for path in files {
        let outcome = match summarize_file(&path, &client, &config).await {
            Ok(summary) if args.export => {
                write_export(&summary, &config, &args.output_dir).map(|_| summary)
            }
            other => other,
        };

        match outcome {
            Ok(summary) => results.push(ProcessResult {
                path,
                summary: Some(summary),
                error: None,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to summarize {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        summary: None,
                        error: Some(error_msg),
                    });
                } else {
                    pb.abandon();
                    error!("Failed to summarize {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    print_results(&results, start);

    Ok(())
}

fn print_results(results: &[ProcessResult], start: Instant) {
    let successful = results.iter().filter(|r| r.summary.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!("{:<40} {:<8} {:>10}", "FILE", "STATUS", "TIME");
    for result in results {
        let name = result.path.display().to_string();
        match &result.summary {
            Some(summary) => println!(
                "{:<40} {:<8} {:>8}ms",
                name,
                style("ok").green(),
                summary.processing_time_ms
            ),
            None => println!("{:<40} {:<8} {:>10}", name, style("failed").red(), "-"),
        }
    }

    println!();
    println!(
        "{} Processed {} files in {:.2?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
