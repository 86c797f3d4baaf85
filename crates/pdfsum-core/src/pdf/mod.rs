//! PDF text extraction module.
//!
//! Pages are extracted on the blocking pool with at most
//! [`ExtractOptions::concurrency`] tasks in flight. Results land in slots
//! indexed by page number, so the joined text is always in ascending page
//! order no matter which task finishes first.

mod extractor;
#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;

pub use extractor::{LopdfDocument, join_fragments};

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, trace};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page-addressable text source.
pub trait PageSource: Send + Sync + 'static {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text of one page (1-indexed), fragments joined by single spaces.
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Options controlling which pages are extracted and how.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Maximum pages to extract (0 = all pages).
    pub max_pages: usize,
    /// Number of pages extracted concurrently.
    pub concurrency: usize,
}

impl ExtractOptions {
    pub fn new(max_pages: usize, concurrency: usize) -> Self {
        Self {
            max_pages,
            concurrency,
        }
    }

    /// Number of pages to extract from a document of `total` pages.
    pub fn page_limit(&self, total: u32) -> u32 {
        if self.max_pages == 0 {
            total
        } else {
            total.min(u32::try_from(self.max_pages).unwrap_or(u32::MAX))
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: 0,
            concurrency: 4,
        }
    }
}

/// Text from a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

/// Text extracted from a document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Page texts joined by newlines, in page order.
    pub text: String,
    /// Pages in ascending order.
    pub pages: Vec<PageText>,
    /// Pages in the document, including any beyond the limit.
    pub total_pages: u32,
}

impl ExtractedText {
    /// Number of pages actually extracted.
    pub fn pages_processed(&self) -> usize {
        self.pages.len()
    }
}

/// Extract page texts concurrently and join them in page order.
///
/// `on_page(page, limit)` fires as each page completes, in completion order.
/// The first failing page fails the whole extraction.
pub async fn extract_pages<P, F>(
    source: Arc<P>,
    options: &ExtractOptions,
    mut on_page: F,
) -> Result<ExtractedText>
where
    P: PageSource,
    F: FnMut(u32, u32),
{
    let total_pages = source.page_count();
    if total_pages == 0 {
        return Err(PdfError::NoPages);
    }

    let limit = options.page_limit(total_pages);
    let concurrency = options.concurrency.max(1);
    debug!(
        "Extracting {} of {} pages with concurrency {}",
        limit, total_pages, concurrency
    );

    let mut tasks = stream::iter(1..=limit)
        .map(|page| {
            let source = Arc::clone(&source);
            async move {
                match tokio::task::spawn_blocking(move || source.page_text(page)).await {
                    Ok(result) => result.map(|text| (page, text)),
                    Err(e) => Err(PdfError::Task {
                        page,
                        reason: e.to_string(),
                    }),
                }
            }
        })
        .buffer_unordered(concurrency);

    let mut slots: Vec<Option<String>> = vec![None; limit as usize];
    while let Some(result) = tasks.next().await {
        let (page, text) = result?;
        trace!("Page {} extracted ({} chars)", page, text.len());
        on_page(page, limit);
        slots[(page - 1) as usize] = Some(text);
    }

    let pages: Vec<PageText> = slots
        .into_iter()
        .zip(1..)
        .map(|(text, number)| PageText {
            number,
            text: text.unwrap_or_default(),
        })
        .collect();

    let text = pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    debug!("Extracted {} chars from {} pages", text.len(), pages.len());

    Ok(ExtractedText {
        text,
        pages,
        total_pages,
    })
}
