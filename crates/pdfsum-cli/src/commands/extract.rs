//! Extract command - local text extraction preview.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use pdfsum_core::validate::content_type_for_path;
use pdfsum_core::{ExtractOptions, LopdfDocument, Upload, ValidationOptions, extract_pages, validate_upload};

use super::{display_name, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Maximum pages to extract (0 = all; default from config)
    #[arg(short, long)]
    max_pages: Option<usize>,

    /// Print each page under its own heading
    #[arg(long)]
    pages: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let upload = Upload::new(
        display_name(&args.input),
        Some(content_type_for_path(&args.input)),
        fs::read(&args.input)?,
    );
    validate_upload(
        &upload,
        &ValidationOptions {
            require_signature: config.pdf.require_pdf_signature,
        },
    )?;

    let Upload { file_name, bytes, .. } = upload;
    let document = tokio::task::spawn_blocking(move || LopdfDocument::load(&bytes)).await??;
    let options = ExtractOptions::new(
        args.max_pages.unwrap_or(config.pdf.client_max_pages),
        config.pdf.concurrency,
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let extracted = extract_pages(Arc::new(document), &options, |_, total| {
        pb.set_length(total as u64);
        pb.inc(1);
        pb.set_message(format!("Processing page {}/{}...", pb.position(), total));
    })
    .await?;
    pb.finish_and_clear();

    if args.pages {
        for page in &extracted.pages {
            println!("{}", style(format!("--- Page {} ---", page.number)).bold());
            println!("{}", page.text);
        }
    } else {
        println!("{}", extracted.text);
    }

    eprintln!(
        "{} Extracted {} of {} pages ({} chars)",
        style("ℹ").blue(),
        extracted.pages_processed(),
        extracted.total_pages,
        extracted.text.chars().count()
    );
    debug!("Extraction of {} complete", file_name);

    Ok(())
}
