use serde::{Deserialize, Serialize};

use crate::model::{
    AdCandidate, AdResult, AircraftIdentity, DefectReport, DefectStatistics, MatchType,
    RegistryAttributes, RiskBreakdown, RiskLevel, TopFailure,
};

/// Parts listed in `topFailures` when statistics are built from raw reports
pub const TOP_FAILURES: usize = 5;

/// Inputs for one aircraft analysis, as resolved by upstream collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub tail_number: String,
    #[serde(default)]
    pub match_type: MatchType,
    /// Registry attributes; used to resolve `identity` when it is absent
    #[serde(default)]
    pub registry: Option<RegistryAttributes>,
    #[serde(default)]
    pub identity: Option<AircraftIdentity>,
    #[serde(default)]
    pub candidates: Vec<AdCandidate>,
    #[serde(default)]
    pub defects: DefectStatistics,
    /// Raw defect reports; when present they replace `defects`
    #[serde(default)]
    pub reports: Vec<DefectReport>,
}

impl AnalysisRequest {
    pub fn resolve_identity(&self) -> AircraftIdentity {
        if let Some(identity) = &self.identity {
            return identity.clone();
        }
        self.registry
            .as_ref()
            .map(AircraftIdentity::from_registry)
            .unwrap_or_else(|| AircraftIdentity::from_registry(&RegistryAttributes::new()))
    }

    pub fn resolve_defects(&self) -> DefectStatistics {
        if self.reports.is_empty() {
            self.defects.clone()
        } else {
            DefectStatistics::from_reports(&self.reports, TOP_FAILURES)
        }
    }
}

/// Result bundle returned to the UI, export and API layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub tail_number: String,
    pub match_type: MatchType,
    pub registry: Option<RegistryAttributes>,
    pub identity: AircraftIdentity,
    pub count: u32,
    pub top_failures: Vec<TopFailure>,
    pub ads: Vec<AdResult>,
    pub risk: RiskBreakdown,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub failed_count: u32,
    pub excess_wear_count: u32,
    pub applicable_count: u32,
    #[serde(rename = "totalADsMatched")]
    pub total_ads_matched: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_reports_replace_precomputed_statistics() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{
                "tailNumber": "N734XY",
                "registry": {"model": "172N", "serialNumber": " "},
                "defects": {"reportCount": 99},
                "reports": [
                    {"partName": "MUFFLER", "partCondition": "Cracked"},
                    {"partName": "MUFFLER", "partCondition": "Failed"},
                    {"partName": "TIRE", "partCondition": "excess wear"}
                ]
            }"#,
        )
        .unwrap();

        let defects = request.resolve_defects();
        assert_eq!(defects.report_count, 3);
        assert_eq!(defects.failed_count(), 2);
        assert_eq!(defects.excess_wear_count(), 1);
        assert_eq!(defects.top_failures[0].part_name, "MUFFLER");

        let identity = request.resolve_identity();
        assert_eq!(identity, AircraftIdentity::new("UNKNOWN", "172N"));
    }

    #[test]
    fn test_precomputed_statistics_used_without_reports() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"tailNumber": "N1", "defects": {"reportCount": 4, "conditionCounts": {"FAILED": 2}}}"#,
        )
        .unwrap();

        let defects = request.resolve_defects();
        assert_eq!(defects.report_count, 4);
        assert_eq!(defects.failed_count(), 2);
        assert_eq!(request.match_type, MatchType::TailNumber);
    }
}
