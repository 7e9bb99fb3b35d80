//! Shared LLM client
//!
//! Wraps the OpenAI provider used for applicability escalation.

use rig::providers::openai;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Overrides the configured API base URL (OpenAI-compatible gateways, proxies)
const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key, against the default
    /// OpenAI endpoint unless `base_url` is given
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self, String> {
        let mut builder = openai::Client::builder().api_key(api_key);
        if let Some(base_url) = base_url {
            builder = builder.base_url(base_url);
        }

        let client = builder
            .build()
            .map_err(|e| format!("Failed to create OpenAI client: {}", e))?;

        Ok(Self { client })
    }

    /// Create a client from `OPENAI_API_KEY`, or `None` when escalation is not configured.
    ///
    /// `OPENAI_BASE_URL` takes precedence over `base_url`.
    pub fn from_env(base_url: Option<&str>) -> Option<Self> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let Some(api_key) = api_key else {
            tracing::warn!("OPENAI_API_KEY not set, applicability escalation disabled");
            return None;
        };

        let base_url = std::env::var(ENV_OPENAI_BASE_URL)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| base_url.map(str::to_string));

        match Self::new(&api_key, base_url.as_deref()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Applicability escalation disabled");
                None
            }
        }
    }

    /// Get a reference to the underlying OpenAI client
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
