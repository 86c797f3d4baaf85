//! Progress notifications shared by every client flow.

/// Progress notifications emitted while a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Parsing the PDF.
    Loading,
    /// A page finished extracting (`page` of `total` selected pages).
    PageExtracted { page: u32, total: u32 },
    /// Waiting on the summarizer. `chars` is the excerpt length when the
    /// caller did the truncation itself.
    Summarizing { chars: Option<usize> },
    /// The summary is ready.
    Done,
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::Loading => write!(f, "Loading PDF..."),
            ProgressEvent::PageExtracted { page, total } => {
                write!(f, "Processing page {}/{}...", page, total)
            }
            ProgressEvent::Summarizing { .. } => write!(f, "Summarizing..."),
            ProgressEvent::Done => write!(f, "Done"),
        }
    }
}
