//! Composite aircraft risk score

use crate::model::{DefectStatistics, RiskBreakdown, Verdict};

pub const BASE_POINTS: u32 = 10;
pub const POINTS_PER_APPLICABLE_AD: u32 = 40;
pub const POINTS_PER_FAILURE: u32 = 10;
pub const POINTS_PER_EXCESS_WEAR: u32 = 2;
pub const MAX_RISK_SCORE: u32 = 100;

/// Combine AD verdicts and defect statistics into a score capped at 100
pub fn aggregate<'a>(
    verdicts: impl IntoIterator<Item = &'a Verdict>,
    defects: &DefectStatistics,
) -> RiskBreakdown {
    let applicable_count = verdicts.into_iter().filter(|v| v.applicable).count() as u32;
    score(applicable_count, defects.failed_count(), defects.excess_wear_count())
}

/// Score from raw counts. Saturating arithmetic keeps huge counts at the cap.
pub fn score(applicable_count: u32, failed_count: u32, excess_wear_count: u32) -> RiskBreakdown {
    let ad_points = applicable_count.saturating_mul(POINTS_PER_APPLICABLE_AD);
    let failure_points = failed_count.saturating_mul(POINTS_PER_FAILURE);
    let wear_points = excess_wear_count.saturating_mul(POINTS_PER_EXCESS_WEAR);

    let raw = BASE_POINTS
        .saturating_add(ad_points)
        .saturating_add(failure_points)
        .saturating_add(wear_points);

    RiskBreakdown {
        base: BASE_POINTS,
        ad_points,
        failure_points,
        wear_points,
        total: raw.min(MAX_RISK_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VerdictSource;

    fn verdict(applicable: bool) -> Verdict {
        Verdict::new(applicable, 90, "x", VerdictSource::Local)
    }

    #[test]
    fn test_defects_only() {
        let mut defects = DefectStatistics::default();
        defects.condition_counts.insert("FAILED".to_string(), 2);
        defects.condition_counts.insert("EXCESS WEAR".to_string(), 3);

        let risk = aggregate(&[verdict(false), verdict(false)], &defects);
        assert_eq!(
            risk,
            RiskBreakdown {
                base: 10,
                ad_points: 0,
                failure_points: 20,
                wear_points: 6,
                total: 36,
            }
        );
    }

    #[test]
    fn test_minimum_is_base() {
        let risk = aggregate(std::iter::empty(), &DefectStatistics::default());
        assert_eq!(risk.total, 10);
    }

    #[test]
    fn test_capped_at_100() {
        let verdicts = vec![verdict(true), verdict(true), verdict(true)];
        let risk = aggregate(&verdicts, &DefectStatistics::default());
        assert_eq!(risk.ad_points, 120);
        assert_eq!(risk.total, 100);

        assert_eq!(score(u32::MAX, u32::MAX, u32::MAX).total, 100);
    }

    #[test]
    fn test_huge_defect_counts_stay_capped() {
        let mut defects = DefectStatistics::default();
        defects.condition_counts.insert("FAILED".to_string(), u32::MAX);
        defects.condition_counts.insert("CRACKED".to_string(), 1);

        let risk = aggregate(std::iter::empty(), &defects);
        assert_eq!(risk.failure_points, u32::MAX);
        assert_eq!(risk.total, 100);
    }

    #[test]
    fn test_monotonic() {
        for applicable in 0..4 {
            for failed in 0..6 {
                for wear in 0..12 {
                    let total = score(applicable, failed, wear).total;
                    assert!(total <= 100);
                    assert!(score(applicable + 1, failed, wear).total >= total);
                    assert!(score(applicable, failed + 1, wear).total >= total);
                    assert!(score(applicable, failed, wear + 1).total >= total);
                }
            }
        }
    }
}
