//! Summarization clients and text budgeting.

#[cfg(feature = "native")]
mod client;
#[cfg(feature = "native")]
mod proxy;
mod reply;

#[cfg(feature = "native")]
pub use client::HttpSummarizer;
#[cfg(feature = "native")]
pub use proxy::ProxyClient;
pub use reply::ServerSummary;

#[cfg(feature = "native")]
use crate::error::UpstreamError;

/// Cut `text` to its first `budget` characters.
///
/// This is a hard cut with no regard for word or sentence boundaries, but it
/// never splits a multi-byte character.
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Something that turns text into a summary.
#[cfg(feature = "native")]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`. Implementations make exactly one attempt.
    fn summarize(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<String, UpstreamError>> + Send;
}

/// Upstream API credential.
///
/// Only the server constructs one; `Debug` never prints the secret.
#[cfg(feature = "native")]
#[derive(Clone)]
pub struct ApiKey(String);

#[cfg(feature = "native")]
impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the credential from an environment variable, ignoring blank values.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "native")]
impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
