//! Error types for the pdfsum-core library.

use thiserror::Error;

/// Main error type for the pdfsum library.
#[derive(Error, Debug)]
pub enum PdfsumError {
    /// Missing or wrong-typed input.
    #[error("{0}")]
    Input(#[from] InputError),

    /// PDF text extraction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Summarization endpoint error.
    #[error("summarization failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Spreadsheet export error.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// A pdfsum server rejected the request.
    #[error("{message}")]
    Server { status: u16, message: String },
}

/// Coarse classification used to pick a response status or exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input; no external system was contacted.
    Input,
    /// The PDF library could not parse the bytes.
    Extraction,
    /// The summarization endpoint failed or answered with garbage.
    Upstream,
    /// Anything else.
    Internal,
}

impl PdfsumError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfsumError::Input(_) => ErrorKind::Input,
            PdfsumError::Pdf(_) => ErrorKind::Extraction,
            PdfsumError::Upstream(_) => ErrorKind::Upstream,
            PdfsumError::Server { status, .. } => match status {
                422 => ErrorKind::Extraction,
                400..=499 => ErrorKind::Input,
                502 | 504 => ErrorKind::Upstream,
                _ => ErrorKind::Internal,
            },
            PdfsumError::Export(_) => ErrorKind::Internal,
        }
    }
}

/// Errors related to the uploaded file or request payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The request carried no PDF payload.
    #[error("No PDF data provided")]
    MissingPayload,

    /// The payload is not valid base64.
    #[error("PDF data is not valid base64: {0}")]
    InvalidBase64(String),

    /// The declared type of the file is not PDF.
    #[error("Please select a PDF file ('{file_name}' has type '{content_type}')")]
    NotPdf {
        file_name: String,
        content_type: String,
    },

    /// The bytes do not start with a PDF signature.
    #[error("'{0}' does not look like a PDF document")]
    BadSignature(String),

    /// The file has no content.
    #[error("'{0}' is empty")]
    Empty(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// A page extraction task panicked or was cancelled.
    #[error("extraction task for page {page} did not complete: {reason}")]
    Task { page: u32, reason: String },
}

/// Errors returned by a summarization endpoint.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The JSON body lacked the expected string field.
    #[error("response has no string field '{0}'")]
    MissingField(String),
}

/// Errors related to spreadsheet export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The xlsx writer rejected the workbook.
    #[error("xlsx writer: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for the pdfsum library.
pub type Result<T> = std::result::Result<T, PdfsumError>;
