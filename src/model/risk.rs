use serde::{Deserialize, Serialize};

/// Additive components of the aircraft risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub base: u32,
    pub ad_points: u32,
    pub failure_points: u32,
    pub wear_points: u32,
    /// Sum of the components, capped at 100
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score > 70 {
            RiskLevel::High
        } else if score > 30 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}
