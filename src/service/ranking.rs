//! AD candidate selection for applicability analysis.
//!
//! A model can match dozens of ADs; only a few are analyzed per request to
//! bound fetch and escalation cost. Candidates are:
//! - **Deduplicated** by AD number (first occurrence wins).
//! - **Prioritized** so that ADs whose subject mentions a safety concern come first,
//!   keeping the original order otherwise.
//! - **Capped** at [`MAX_ANALYZED_ADS`].

use std::collections::HashSet;

use crate::model::AdCandidate;

/// Maximum number of ADs analyzed per aircraft
pub const MAX_ANALYZED_ADS: usize = 5;

const SAFETY_TERMS: &[&str] = &["safety", "emergency", "unsafe"];

/// Normalized model names used for the AD lookup.
///
/// The first entry is the model itself (upper-cased, without a leading
/// "MODEL"); the second, when different, drops trailing letter suffixes
/// (`172N` becomes `172`).
pub fn model_variants(model: &str) -> Vec<String> {
    let normalized = model.trim().to_uppercase();
    let normalized = normalized
        .strip_prefix("MODEL ")
        .map(|m| m.trim().to_string())
        .unwrap_or(normalized);

    if normalized.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![normalized.clone()];

    let base = normalized.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if !base.is_empty() && base != normalized {
        variants.push(base.to_string());
    }

    variants
}

fn is_safety_relevant(candidate: &AdCandidate) -> bool {
    let subject = candidate.subject.to_lowercase();
    SAFETY_TERMS.iter().any(|term| subject.contains(term))
}

/// Drop repeated AD numbers, keeping the first occurrence
pub fn dedupe_candidates(mut candidates: Vec<AdCandidate>) -> Vec<AdCandidate> {
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.ad_number.trim().to_uppercase()));
    candidates
}

/// Select at most [`MAX_ANALYZED_ADS`] candidates, safety-relevant subjects first
pub fn rank(candidates: Vec<AdCandidate>) -> Vec<AdCandidate> {
    let mut candidates = dedupe_candidates(candidates);

    // Stable sort keeps the lookup order within each group
    candidates.sort_by_key(|c| !is_safety_relevant(c));
    candidates.truncate(MAX_ANALYZED_ADS);
    candidates
}
