//! Core library for PDF summarization.
//!
//! This crate provides:
//! - Upload validation and base64 payload decoding
//! - Per-page PDF text extraction with an ordered concurrent join
//! - Summarization clients (upstream endpoint and server proxy)
//! - Spreadsheet export of summaries
//! - A request pipeline tying the stages together with progress callbacks

pub mod error;
pub mod export;
pub mod models;
pub mod summarize;
pub mod validate;

#[cfg(feature = "native")]
pub mod pdf;
#[cfg(feature = "native")]
pub mod pipeline;

pub use error::{ErrorKind, ExportError, InputError, PdfError, PdfsumError, Result, UpstreamError};
pub use export::{ExportArtifact, export_file_name};
pub use models::api::{ErrorResponse, SummarizeRequest, SummarizeResponse};
pub use models::config::PdfsumConfig;
pub use models::progress::ProgressEvent;
pub use summarize::{ServerSummary, truncate_chars};
pub use validate::{Upload, ValidationOptions, decode_pdf_payload, validate_upload};

#[cfg(feature = "native")]
pub use pdf::{ExtractOptions, ExtractedText, LopdfDocument, PageSource, PageText, extract_pages};
#[cfg(feature = "native")]
pub use pipeline::{PipelineObserver, SummaryOutcome, SummaryPipeline};
#[cfg(feature = "native")]
pub use summarize::{ApiKey, HttpSummarizer, ProxyClient, Summarizer};
