//! Per-page PDF text extraction using lopdf.

use lopdf::Document;
use tracing::debug;

use super::{PageSource, Result};
use crate::error::PdfError;

/// A parsed PDF document.
pub struct LopdfDocument {
    document: Document,
}

impl LopdfDocument {
    /// Parse a PDF from bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document })
    }
}

impl PageSource for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if !self.document.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        let raw = self
            .document
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction {
                page,
                reason: e.to_string(),
            })?;

        Ok(join_fragments(&raw))
    }
}

/// Join the text fragments lopdf emits (one per line) with single spaces.
pub fn join_fragments(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::sample_pdf;
    use crate::pdf::{ExtractOptions, extract_pages};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_join_fragments() {
        assert_eq!(join_fragments("Hello\n  world \n\n!\n"), "Hello world !");
        assert_eq!(join_fragments(""), "");
    }

    #[test]
    fn test_rejects_garbage() {
        let err = LopdfDocument::load(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_page_text() {
        let doc = LopdfDocument::load(&sample_pdf(&["Quarterly report", "Revenue grew"])).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.page_text(2).unwrap().contains("Revenue grew"));
        assert!(matches!(doc.page_text(3), Err(PdfError::InvalidPage(3))));
    }

    #[tokio::test]
    async fn test_extracts_pages_in_order() {
        let pdf = sample_pdf(&["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]);
        let doc = Arc::new(LopdfDocument::load(&pdf).unwrap());

        let result = extract_pages(doc, &ExtractOptions::new(5, 3), |_, _| {})
            .await
            .unwrap();

        assert_eq!(result.total_pages, 6);
        let words: Vec<&str> = result.pages.iter().map(|p| p.text.trim()).collect();
        assert_eq!(words, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
        assert!(!result.text.contains("foxtrot"));
    }
}
