//! AD applicability classification
//!
//! Classifiers are arranged in tiers. The first tier always runs; each later
//! tier is consulted only while the current verdict is below the escalation
//! threshold, the text is long enough to be worth sending, and the tier is
//! available. A usable verdict from a later tier replaces the current one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{ClassifierConfig, Verdict};

pub mod escalation;
pub mod prompts;
pub mod rules;

pub use escalation::{EscalationClassifier, EscalationError};
pub use rules::LocalClassifier;

/// Inputs shared by every classifier tier
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    pub serial_number: &'a str,
    pub model: &'a str,
    pub ad_number: &'a str,
    pub text: &'a str,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the classifier is configured and can be invoked
    fn is_available(&self) -> bool {
        true
    }

    async fn classify(&self, ctx: &ClassificationContext<'_>) -> Verdict;
}

pub struct ClassifierChain {
    primary: Arc<dyn Classifier>,
    escalations: Vec<Arc<dyn Classifier>>,
    config: ClassifierConfig,
}

impl ClassifierChain {
    pub fn new(primary: Arc<dyn Classifier>, config: ClassifierConfig) -> Self {
        Self {
            primary,
            escalations: Vec::new(),
            config,
        }
    }

    /// Append an escalation tier, consulted after the tiers already present
    pub fn with_escalation(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.escalations.push(classifier);
        self
    }

    fn should_escalate(&self, current: &Verdict, text: &str, tier: &dyn Classifier) -> bool {
        current.confidence < self.config.escalation_threshold
            && text.chars().count() > self.config.min_escalation_text_chars
            && tier.is_available()
    }

    pub async fn classify(&self, ctx: &ClassificationContext<'_>) -> Verdict {
        let mut verdict = self.primary.classify(ctx).await;

        tracing::debug!(
            ad = %ctx.ad_number,
            classifier = self.primary.name(),
            applicable = verdict.applicable,
            confidence = verdict.confidence,
            "Primary classification"
        );

        for tier in &self.escalations {
            if !self.should_escalate(&verdict, ctx.text, tier.as_ref()) {
                continue;
            }

            let candidate = tier.classify(ctx).await;

            if candidate.is_usable() {
                tracing::info!(
                    ad = %ctx.ad_number,
                    classifier = tier.name(),
                    previous_confidence = verdict.confidence,
                    confidence = candidate.confidence,
                    applicable = candidate.applicable,
                    "Escalated verdict replaces previous verdict"
                );
                verdict = candidate;
            } else {
                tracing::debug!(
                    ad = %ctx.ad_number,
                    classifier = tier.name(),
                    "Escalation produced no usable verdict, keeping previous verdict"
                );
            }
        }

        verdict
    }
}
