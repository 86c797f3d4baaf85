//! The request pipeline: validate, extract, truncate, summarize.
//!
//! Callers pass a [`PipelineObserver`] to receive progress, success and
//! error notifications instead of the pipeline touching any UI.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{InputError, PdfError, PdfsumError, Result};
use crate::export::{ExportArtifact, export_summary};
use crate::models::config::{ExportConfig, PdfsumConfig};
use crate::models::progress::ProgressEvent;
use crate::pdf::{ExtractOptions, LopdfDocument, extract_pages};
use crate::summarize::{Summarizer, truncate_chars};
use crate::validate::{Upload, ValidationOptions, decode_pdf_payload, validate_upload};

/// Receives pipeline notifications. Every method defaults to a no-op.
pub trait PipelineObserver: Send + Sync {
    fn on_progress(&self, _event: &ProgressEvent) {}
    fn on_success(&self, _outcome: &SummaryOutcome) {}
    fn on_error(&self, _error: &PdfsumError) {}
}

/// Observer that ignores everything.
impl PipelineObserver for () {}

/// A successful summary of one upload.
///
/// Only the pipeline builds one, so holding an outcome means the summarizer
/// answered.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    file_name: String,
    summary: String,
    pages_processed: usize,
    total_pages: u32,
    chars_sent: usize,
}

impl SummaryOutcome {
    /// Name of the summarized file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Summary returned by the summarizer.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Pages whose text was extracted.
    pub fn pages_processed(&self) -> usize {
        self.pages_processed
    }

    /// Pages in the document.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Characters sent to the summarizer after truncation.
    pub fn chars_sent(&self) -> usize {
        self.chars_sent
    }

    pub fn into_summary(self) -> String {
        self.summary
    }

    /// Export this summary as a workbook.
    pub fn export(&self, config: &ExportConfig) -> Result<ExportArtifact> {
        Ok(export_summary(&self.summary, &self.file_name, config)?)
    }
}

/// Runs uploads through extraction and summarization.
pub struct SummaryPipeline<S> {
    summarizer: S,
    validation: ValidationOptions,
    extract: ExtractOptions,
    truncate_chars: usize,
}

impl<S: Summarizer> SummaryPipeline<S> {
    pub fn new(summarizer: S) -> Self {
        Self::from_config(summarizer, &PdfsumConfig::default())
    }

    /// Build a pipeline using the server-side settings of `config`.
    pub fn from_config(summarizer: S, config: &PdfsumConfig) -> Self {
        Self {
            summarizer,
            validation: ValidationOptions {
                require_signature: config.pdf.require_pdf_signature,
            },
            extract: ExtractOptions::new(config.pdf.max_pages, config.pdf.concurrency),
            truncate_chars: config.summarizer.truncate_chars,
        }
    }

    /// Override the character budget.
    pub fn with_truncate_chars(mut self, budget: usize) -> Self {
        self.truncate_chars = budget;
        self
    }

    pub fn summarizer(&self) -> &S {
        &self.summarizer
    }

    /// Process one upload, reporting to `observer`.
    pub async fn run(&self, upload: Upload, observer: &dyn PipelineObserver) -> Result<SummaryOutcome> {
        let result = self.process(upload, observer).await;
        match &result {
            Ok(outcome) => {
                observer.on_progress(&ProgressEvent::Done);
                observer.on_success(outcome);
            }
            Err(e) => {
                warn!("Request failed: {}", e);
                observer.on_error(e);
            }
        }
        result
    }

    /// Process a base64 payload (the server flow).
    pub async fn run_base64(
        &self,
        payload: Option<&str>,
        file_name: &str,
        observer: &dyn PipelineObserver,
    ) -> Result<SummaryOutcome> {
        let decoded = payload
            .ok_or(InputError::MissingPayload)
            .and_then(decode_pdf_payload);

        match decoded {
            Ok(bytes) => self.run(Upload::new(file_name, None, bytes), observer).await,
            Err(e) => {
                let err = PdfsumError::from(e);
                observer.on_error(&err);
                Err(err)
            }
        }
    }

    async fn process(&self, upload: Upload, observer: &dyn PipelineObserver) -> Result<SummaryOutcome> {
        let start = Instant::now();
        validate_upload(&upload, &self.validation)?;

        let Upload { file_name, bytes, .. } = upload;
        info!("Processing {} ({} bytes)", file_name, bytes.len());

        observer.on_progress(&ProgressEvent::Loading);
        let document = tokio::task::spawn_blocking(move || LopdfDocument::load(&bytes))
            .await
            .map_err(|e| PdfError::Parse(format!("loader task failed: {}", e)))??;

        let extracted = extract_pages(Arc::new(document), &self.extract, |page, total| {
            observer.on_progress(&ProgressEvent::PageExtracted { page, total });
        })
        .await?;

        let excerpt = truncate_chars(&extracted.text, self.truncate_chars);
        let chars_sent = excerpt.chars().count();
        debug!(
            "Sending {} of {} chars to summarizer",
            chars_sent,
            extracted.text.chars().count()
        );

        observer.on_progress(&ProgressEvent::Summarizing {
            chars: Some(chars_sent),
        });
        let summary = self.summarizer.summarize(excerpt).await?;

        let outcome = SummaryOutcome {
            file_name,
            summary,
            pages_processed: extracted.pages_processed(),
            total_pages: extracted.total_pages,
            chars_sent,
        };
        info!(
            "Summarized {} ({} pages, {} chars) in {:?}",
            outcome.file_name,
            outcome.pages_processed,
            chars_sent,
            start.elapsed()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, UpstreamError};
    use crate::pdf::fixtures::sample_pdf;
    use crate::validate::encode_pdf_payload;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records what it was asked to summarize.
    #[derive(Default)]
    struct FakeSummarizer {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, text: &str) -> std::result::Result<String, UpstreamError> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(UpstreamError::Status {
                    status: 500,
                    reason: "Internal Server Error".into(),
                });
            }
            Ok(format!("summary of {} chars", text.chars().count()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ProgressEvent>>,
        successes: Mutex<usize>,
        errors: Mutex<Vec<String>>,
    }

    impl PipelineObserver for Recorder {
        fn on_progress(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
        fn on_success(&self, _outcome: &SummaryOutcome) {
            *self.successes.lock().unwrap() += 1;
        }
        fn on_error(&self, error: &PdfsumError) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    fn pdf_upload(pages: &[&str]) -> Upload {
        Upload::new("notes.pdf", Some("application/pdf".into()), sample_pdf(pages))
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_without_summarizer_call() {
        let pipeline = SummaryPipeline::new(FakeSummarizer::default());
        let recorder = Recorder::default();

        let upload = Upload::new("notes.txt", Some("text/plain".into()), b"hello".to_vec());
        let err = pipeline.run(upload, &recorder).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(pipeline.summarizer().calls.lock().unwrap().is_empty());
        assert_eq!(recorder.errors.lock().unwrap().len(), 1);
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_run() {
        let pipeline = SummaryPipeline::new(FakeSummarizer::default());
        let recorder = Recorder::default();

        let outcome = pipeline
            .run(pdf_upload(&["first page", "second page"]), &recorder)
            .await
            .unwrap();

        assert_eq!(outcome.file_name, "notes.pdf");
        assert_eq!(outcome.pages_processed, 2);
        assert_eq!(outcome.total_pages, 2);
        assert!(outcome.summary.starts_with("summary of"));

        let calls = pipeline.summarizer().calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let first = calls[0].find("first page").unwrap();
        let second = calls[0].find("second page").unwrap();
        assert!(first < second);

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.first(), Some(&ProgressEvent::Loading));
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::Summarizing { chars: Some(n) } if *n > 0
        )));
        assert_eq!(events.last(), Some(&ProgressEvent::Done));
        assert_eq!(*recorder.successes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exactly_budget_chars_sent() {
        let long_line = "abcdefghij".repeat(20);
        let pipeline = SummaryPipeline::new(FakeSummarizer::default()).with_truncate_chars(37);

        let outcome = pipeline.run(pdf_upload(&[long_line.as_str()]), &()).await.unwrap();

        let calls = pipeline.summarizer().calls.lock().unwrap();
        assert_eq!(calls[0].chars().count(), 37);
        assert_eq!(outcome.chars_sent, 37);
        assert!(long_line.starts_with(calls[0].as_str()));
    }

    #[tokio::test]
    async fn test_upstream_failure_reports_error_and_no_outcome() {
        let pipeline = SummaryPipeline::new(FakeSummarizer {
            fail: true,
            ..Default::default()
        });
        let recorder = Recorder::default();

        let err = pipeline
            .run(pdf_upload(&["page"]), &recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(*recorder.successes.lock().unwrap(), 0);
        assert!(!recorder.events.lock().unwrap().contains(&ProgressEvent::Done));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_extraction_error() {
        let pipeline = SummaryPipeline::new(FakeSummarizer::default());
        let upload = Upload::new("broken.pdf", None, b"%PDF-1.7\ngarbage".to_vec());

        let err = pipeline.run(upload, &()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(pipeline.summarizer().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_base64() {
        let pipeline = SummaryPipeline::new(FakeSummarizer::default());

        let missing = pipeline.run_base64(None, "a.pdf", &()).await.unwrap_err();
        assert!(matches!(missing, PdfsumError::Input(InputError::MissingPayload)));

        let payload = encode_pdf_payload(&sample_pdf(&["encoded page"]));
        let outcome = pipeline
            .run_base64(Some(&payload), "a.pdf", &())
            .await
            .unwrap();
        assert_eq!(outcome.pages_processed, 1);
    }

    #[tokio::test]
    async fn test_outcome_export() {
        let pipeline = SummaryPipeline::new(FakeSummarizer::default());
        let outcome = pipeline.run(pdf_upload(&["page"]), &()).await.unwrap();

        let artifact = outcome.export(&ExportConfig::default()).unwrap();
        assert_eq!(artifact.file_name, "notes.pdf_summary.xlsx");
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(
            ProgressEvent::PageExtracted { page: 2, total: 5 }.to_string(),
            "Processing page 2/5..."
        );
        assert_eq!(ProgressEvent::Loading.to_string(), "Loading PDF...");
    }
}
