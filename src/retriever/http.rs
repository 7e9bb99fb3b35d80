//! HTTP fetcher restricted to trusted AD document hosts

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use url::Url;

use super::{DocumentFetcher, RetrieverError};
use crate::model::FetcherConfig;

const MAX_REDIRECTS: usize = 5;

pub struct HttpDocumentFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpDocumentFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, RetrieverError> {
        let client = Client::builder()
            .user_agent(concat!("airworthiness-intel/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .redirect(allow_listed_redirects(config.clone()))
            .build()?;

        tracing::info!(allow = ?config.allowed_hosts, "Document host allow-list configured");

        Ok(Self { client, config })
    }

    /// Single GET with no retries
    async fn retrieve(&self, url: &str) -> Result<String, RetrieverError> {
        let url = Url::parse(url).map_err(|_| RetrieverError::InvalidUrl(url.to_string()))?;

        if !self.config.is_url_allowed(&url) {
            return Err(RetrieverError::Blocked(url.to_string()));
        }

        tracing::debug!(url = %url, "Fetching AD document");

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrieverError::Timeout(url.to_string())
            } else {
                RetrieverError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(RetrieverError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Follow a redirect only while every hop stays on the allow-list.
/// A stopped redirect surfaces as a non-success status.
fn allow_listed_redirects(config: FetcherConfig) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if config.is_url_allowed(attempt.url()) {
            attempt.follow()
        } else {
            tracing::debug!(url = %attempt.url(), "Redirect target not on allow-list");
            attempt.stop()
        }
    })
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> String {
        match self.retrieve(url).await {
            Ok(body) => body,
            Err(e) => {
                match &e {
                    RetrieverError::Blocked(_) | RetrieverError::InvalidUrl(_) => {
                        tracing::debug!(url = %url, error = %e, "Skipping AD document");
                    }
                    _ => {
                        tracing::warn!(url = %url, error = %e, "Failed to fetch AD document");
                    }
                }
                String::new()
            }
        }
    }
}
