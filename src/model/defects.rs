use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Part conditions that contribute to the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectCondition {
    Failed,
    Cracked,
    ExcessWear,
}

impl DefectCondition {
    pub const ALL: [DefectCondition; 3] = [
        DefectCondition::Failed,
        DefectCondition::Cracked,
        DefectCondition::ExcessWear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectCondition::Failed => "FAILED",
            DefectCondition::Cracked => "CRACKED",
            DefectCondition::ExcessWear => "EXCESS WEAR",
        }
    }

    /// Exact match on the normalized condition string; substrings do not count
    pub fn parse(condition: &str) -> Option<Self> {
        let normalized = normalize_condition(condition);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
    }
}

/// Trim, collapse internal whitespace and upper-case a part condition
pub fn normalize_condition(condition: &str) -> String {
    condition
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFailure {
    pub part_name: String,
    pub count: u32,
}

/// A single service difficulty report, reduced to the fields used for statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectReport {
    #[serde(default)]
    pub part_name: Option<String>,
    #[serde(default)]
    pub part_condition: Option<String>,
}

/// Defect-report statistics for one tail number or model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectStatistics {
    #[serde(default)]
    pub report_count: u32,
    #[serde(default)]
    pub top_failures: Vec<TopFailure>,
    /// Report counts keyed by normalized part condition
    #[serde(default)]
    pub condition_counts: BTreeMap<String, u32>,
}

impl DefectStatistics {
    /// Build statistics from raw reports, keeping the `top_n` most reported parts
    pub fn from_reports(reports: &[DefectReport], top_n: usize) -> Self {
        let mut part_counts: HashMap<&str, u32> = HashMap::new();
        let mut condition_counts: BTreeMap<String, u32> = BTreeMap::new();

        for report in reports {
            if let Some(part) = report.part_name.as_deref().map(str::trim)
                && !part.is_empty()
            {
                *part_counts.entry(part).or_default() += 1;
            }

            if let Some(condition) = report.part_condition.as_deref() {
                let normalized = normalize_condition(condition);
                if !normalized.is_empty() {
                    *condition_counts.entry(normalized).or_default() += 1;
                }
            }
        }

        let mut top_failures: Vec<TopFailure> = part_counts
            .into_iter()
            .map(|(part_name, count)| TopFailure {
                part_name: part_name.to_string(),
                count,
            })
            .collect();
        top_failures.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.part_name.cmp(&b.part_name)));
        top_failures.truncate(top_n);

        Self {
            report_count: reports.len() as u32,
            top_failures,
            condition_counts,
        }
    }

    pub fn count_for(&self, condition: DefectCondition) -> u32 {
        self.condition_counts
            .iter()
            .filter(|(key, _)| DefectCondition::parse(key) == Some(condition))
            .map(|(_, count)| *count)
            .fold(0u32, u32::saturating_add)
    }

    /// Reports whose part failed or cracked
    pub fn failed_count(&self) -> u32 {
        self.count_for(DefectCondition::Failed)
            .saturating_add(self.count_for(DefectCondition::Cracked))
    }

    pub fn excess_wear_count(&self) -> u32 {
        self.count_for(DefectCondition::ExcessWear)
    }
}
