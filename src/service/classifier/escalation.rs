//! Escalation of inconclusive applicability decisions to an LLM

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

use super::prompts::{ESCALATION_SYSTEM_PROMPT, build_escalation_prompt};
use super::{ClassificationContext, Classifier};
use crate::model::{EscalationConfig, ExtractedVerdict, Verdict};
use crate::service::llm::LlmClient;

/// Environment variable for the escalation model
const ENV_ESCALATION_MODEL: &str = "ESCALATION_MODEL";

const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

#[derive(Debug, thiserror::Error)]
pub enum EscalationError {
    #[error("Escalation service not configured")]
    NotConfigured,

    #[error("Escalation timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Classifier that asks the LLM for a structured verdict.
///
/// Every failure degrades to [`Verdict::analysis_unavailable`].
pub struct EscalationClassifier {
    llm_client: Option<LlmClient>,
    model: String,
    timeout: Duration,
}

impl EscalationClassifier {
    /// Model precedence: `ESCALATION_MODEL`, then the config file, then gpt-4o-mini
    pub fn new(llm_client: Option<LlmClient>, config: &EscalationConfig) -> Self {
        let model = std::env::var(ENV_ESCALATION_MODEL)
            .ok()
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        tracing::info!(
            model = %model,
            configured = llm_client.is_some(),
            "Applicability escalation initialized"
        );

        Self {
            llm_client,
            model,
            timeout: config.timeout(),
        }
    }

    async fn request_verdict(
        &self,
        ctx: &ClassificationContext<'_>,
    ) -> Result<Verdict, EscalationError> {
        let llm_client = self
            .llm_client
            .as_ref()
            .ok_or(EscalationError::NotConfigured)?;

        let prompt = build_escalation_prompt(ctx);
        let prompt_length = prompt.len();
        let start_time = Instant::now();

        tracing::debug!(
            ad = %ctx.ad_number,
            model = %self.model,
            prompt_length = prompt_length,
            "Initiating OpenAI API call for applicability escalation"
        );

        let extractor = llm_client
            .openai_client()
            .extractor::<ExtractedVerdict>(&self.model)
            .preamble(ESCALATION_SYSTEM_PROMPT)
            .additional_params(serde_json::json!({
                "temperature": 0.0,
                "seed": 42
            }))
            .build();

        let extracted = tokio::time::timeout(self.timeout, extractor.extract(&prompt))
            .await
            .map_err(|_| EscalationError::Timeout(self.timeout))?
            .map_err(|e| EscalationError::ExtractionFailed(e.to_string()))?;

        tracing::info!(
            ad = %ctx.ad_number,
            model = %self.model,
            elapsed_ms = start_time.elapsed().as_millis(),
            applicable = extracted.applicable,
            confidence = extracted.confidence,
            "OpenAI API call for applicability escalation completed"
        );

        Ok(extracted.into())
    }
}

#[async_trait]
impl Classifier for EscalationClassifier {
    fn name(&self) -> &'static str {
        "escalation"
    }

    fn is_available(&self) -> bool {
        self.llm_client.is_some()
    }

    async fn classify(&self, ctx: &ClassificationContext<'_>) -> Verdict {
        match self.request_verdict(ctx).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(
                    ad = %ctx.ad_number,
                    model = %self.model,
                    error = %e,
                    "Applicability escalation failed, using fallback verdict"
                );
                Verdict::analysis_unavailable()
            }
        }
    }
}
