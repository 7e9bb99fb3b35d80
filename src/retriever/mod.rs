//! Document retrieval for AD applicability text

mod http;

use async_trait::async_trait;

pub use http::HttpDocumentFetcher;

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL blocked by configuration: {0}")]
    Blocked(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },
}

/// Fetches the raw text of an AD document.
///
/// Implementations never fail: any problem degrades to an empty string.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> String;
}
