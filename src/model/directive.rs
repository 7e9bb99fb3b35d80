use serde::{Deserialize, Serialize};

use crate::model::{Verdict, VerdictSource};

/// AD selected for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCandidate {
    pub ad_number: String,
    pub subject: String,
    #[serde(default)]
    pub document_link: Option<String>,
}

/// AD metadata as stored in the directive catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveRecord {
    pub ad_number: String,
    pub subject: String,
    #[serde(default)]
    pub model_affected: Option<String>,
    #[serde(default)]
    pub ad_link: Option<String>,
}

impl From<&DirectiveRecord> for AdCandidate {
    fn from(record: &DirectiveRecord) -> Self {
        Self {
            ad_number: record.ad_number.clone(),
            subject: record.subject.clone(),
            document_link: record.ad_link.clone(),
        }
    }
}

/// Per-AD outcome returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResult {
    pub ad_number: String,
    pub subject: String,
    pub ad_link: Option<String>,
    pub applicable: bool,
    pub confidence: u8,
    pub reasoning: String,
    pub verdict_source: VerdictSource,
}

impl AdResult {
    pub fn new(candidate: AdCandidate, verdict: Verdict) -> Self {
        Self {
            ad_number: candidate.ad_number,
            subject: candidate.subject,
            ad_link: candidate.document_link,
            applicable: verdict.applicable,
            confidence: verdict.confidence,
            reasoning: verdict.reasoning,
            verdict_source: verdict.source,
        }
    }
}
