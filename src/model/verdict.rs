use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MAX_CONFIDENCE: u8 = 100;

/// Reasoning used when no text was available to classify
pub const REASON_INSUFFICIENT_DATA: &str = "insufficient data";

/// Reasoning used when the escalation service gave nothing usable
pub const REASON_ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

/// Reasoning used when no rule matched the extracted text
pub const REASON_UNDETERMINED: &str = "Applicability could not be determined from the directive text";

/// Reasoning used when the aircraft serial number is unresolved
pub const REASON_MANUAL_REVIEW: &str =
    "Serial number unavailable: manual review required to determine applicability";

/// Which tier produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    Local,
    Escalation,
    ManualReview,
}

/// Applicability judgment for one aircraft against one AD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub applicable: bool,
    pub confidence: u8,
    pub reasoning: String,
    pub source: VerdictSource,
}

impl Verdict {
    /// Build a verdict, clamping confidence to 0..=100 and substituting a
    /// generic reasoning string when none is supplied
    pub fn new(
        applicable: bool,
        confidence: i64,
        reasoning: impl Into<String>,
        source: VerdictSource,
    ) -> Self {
        let reasoning = reasoning.into();
        let reasoning = if reasoning.trim().is_empty() {
            REASON_UNDETERMINED.to_string()
        } else {
            reasoning
        };

        Self {
            applicable,
            confidence: clamp_confidence(confidence),
            reasoning,
            source,
        }
    }

    pub fn insufficient_data() -> Self {
        Self::new(false, 0, REASON_INSUFFICIENT_DATA, VerdictSource::Local)
    }

    pub fn analysis_unavailable() -> Self {
        Self::new(false, 0, REASON_ANALYSIS_UNAVAILABLE, VerdictSource::Escalation)
    }

    pub fn manual_review() -> Self {
        Self::new(false, 0, REASON_MANUAL_REVIEW, VerdictSource::ManualReview)
    }

    /// A verdict carries information when it is positive or has any confidence
    pub fn is_usable(&self) -> bool {
        self.applicable || self.confidence > 0
    }
}

pub fn clamp_confidence(confidence: i64) -> u8 {
    confidence.clamp(0, i64::from(MAX_CONFIDENCE)) as u8
}

/// Structured verdict requested from the escalation service
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedVerdict {
    #[schemars(description = "True if the aircraft falls under the directive's applicability")]
    pub applicable: bool,

    #[schemars(description = "Certainty in the applicability decision, 0 to 100")]
    pub confidence: i64,

    #[schemars(
        description = "One or two sentences citing the directive text (serial ranges, models) that drove the decision"
    )]
    pub reasoning: String,
}

impl From<ExtractedVerdict> for Verdict {
    fn from(extracted: ExtractedVerdict) -> Self {
        Verdict::new(
            extracted.applicable,
            extracted.confidence,
            extracted.reasoning,
            VerdictSource::Escalation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Verdict::new(true, 250, "x", VerdictSource::Local).confidence, 100);
        assert_eq!(Verdict::new(true, -7, "x", VerdictSource::Local).confidence, 0);
        assert_eq!(Verdict::new(true, 64, "x", VerdictSource::Local).confidence, 64);
    }

    #[test]
    fn test_blank_reasoning_gets_generic_text() {
        let verdict = Verdict::new(false, 10, "   ", VerdictSource::Escalation);
        assert_eq!(verdict.reasoning, REASON_UNDETERMINED);
    }

    #[test]
    fn test_extracted_verdict_out_of_range_is_clamped() {
        let verdict: Verdict = ExtractedVerdict {
            applicable: true,
            confidence: 140,
            reasoning: "Serial within range".to_string(),
        }
        .into();
        assert_eq!(verdict.confidence, 100);
        assert_eq!(verdict.source, VerdictSource::Escalation);
    }

    #[test]
    fn test_usable() {
        assert!(!Verdict::analysis_unavailable().is_usable());
        assert!(Verdict::new(true, 0, "x", VerdictSource::Escalation).is_usable());
        assert!(Verdict::new(false, 40, "x", VerdictSource::Escalation).is_usable());
    }
}
