//! Local heuristic applicability rules
//!
//! Rules run in a fixed priority order against the upper-cased directive
//! text and the first rule that returns a verdict wins:
//! 1. Explicit serial range ("X through Y", "serial numbers X to Y")
//! 2. Blanket applicability ("all serial numbers", "all airplanes")
//! 3. Serial number quoted in the text
//! 4. Model named without nearby exclusion language
//! 5. Exclusion language anywhere
//! 6. Hyphenated serial range ("S/N 100-200")
//! 7. Default: undetermined, low confidence

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{ClassificationContext, Classifier};
use crate::model::verdict::REASON_UNDETERMINED;
use crate::model::{ClassifierConfig, Verdict, VerdictSource};

const CONFIDENCE_RANGE_MATCH: i64 = 95;
const CONFIDENCE_RANGE_MISS: i64 = 90;
const CONFIDENCE_BLANKET: i64 = 90;
const CONFIDENCE_SERIAL_LISTED: i64 = 85;
const CONFIDENCE_MODEL_NAMED: i64 = 75;
const CONFIDENCE_EXCLUDED: i64 = 70;
const CONFIDENCE_ALT_RANGE_MATCH: i64 = 92;
const CONFIDENCE_UNDETERMINED: i64 = 30;

/// Shortest serial number considered for a literal text match
const MIN_LITERAL_SERIAL_CHARS: usize = 3;

/// Bytes either side of a model mention searched for exclusion language
const EXCLUSION_WINDOW_CHARS: usize = 120;

const EXCLUSION_PHRASES: &[&str] = &[
    "NOT APPLICABLE",
    "DOES NOT APPLY",
    "DO NOT APPLY",
    "NOT AFFECTED",
    "EXCLUDED",
    "EXCLUDES",
    "EXCLUDING",
    "IS EXEMPT",
    "ARE EXEMPT",
];

static THROUGH_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s+(?:THROUGH|THRU)\s+(\d+)\b").expect("through range pattern is valid")
});

static TO_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:SERIAL\s+NUMBERS?|S/NS?)\s*(?:\(S/NS?\)\s*)?:?\s*(\d+)\s+TO\s+(\d+)\b")
        .expect("to range pattern is valid")
});

static HYPHEN_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:SERIAL\s+NUMBERS?|S/NS?|SN)\s*(?:RANGE\s*)?:?\s*(\d+)\s*[-–—]\s*(\d+)\b")
        .expect("hyphen range pattern is valid")
});

static BLANKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bALL\s+(?:[A-Z][A-Z\-]*\s+)?(?:SERIAL\s+NUMBERS|S/NS?|AIRCRAFT|AIRPLANES|AEROPLANES|HELICOPTERS|MODELS)\b",
    )
    .expect("blanket pattern is valid")
});

/// Normalized view of the classification inputs shared by every rule
struct RuleInput {
    text: String,
    serial: String,
    numeric_serial: Option<u64>,
    model: String,
}

impl RuleInput {
    fn new(ctx: &ClassificationContext<'_>) -> Self {
        let serial = ctx.serial_number.trim().to_uppercase();
        let model = ctx.model.trim().to_uppercase();
        let model = model
            .strip_prefix("MODEL ")
            .map(|m| m.trim().to_string())
            .unwrap_or(model);

        Self {
            text: ctx.text.to_uppercase(),
            numeric_serial: serial.parse().ok(),
            serial,
            model,
        }
    }
}

type Rule = fn(&RuleInput) -> Option<Verdict>;

/// Rules in priority order
const RULES: &[(&str, Rule)] = &[
    ("explicit_range", explicit_range),
    ("blanket", blanket_applicability),
    ("serial_listed", serial_listed),
    ("model_named", model_named),
    ("exclusion", exclusion_phrase),
    ("hyphen_range", hyphen_range),
];

/// Pattern-matching classifier that never leaves the process
pub struct LocalClassifier {
    min_text_chars: usize,
}

impl LocalClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            min_text_chars: config.min_text_chars,
        }
    }

    pub fn classify_text(&self, ctx: &ClassificationContext<'_>) -> Verdict {
        if ctx.text.trim().chars().count() < self.min_text_chars {
            return Verdict::insufficient_data();
        }

        let input = RuleInput::new(ctx);

        for (name, rule) in RULES {
            if let Some(verdict) = rule(&input) {
                tracing::debug!(ad = %ctx.ad_number, rule = name, "Local rule matched");
                return verdict;
            }
        }

        local(false, CONFIDENCE_UNDETERMINED, REASON_UNDETERMINED)
    }
}

impl Default for LocalClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[async_trait]
impl Classifier for LocalClassifier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn classify(&self, ctx: &ClassificationContext<'_>) -> Verdict {
        self.classify_text(ctx)
    }
}

fn local(applicable: bool, confidence: i64, reasoning: impl Into<String>) -> Verdict {
    Verdict::new(applicable, confidence, reasoning, VerdictSource::Local)
}

fn collect_ranges(patterns: &[&Regex], text: &str) -> Vec<(u64, u64)> {
    let mut ranges = Vec::new();
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let start = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
            let end = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
            if let (Some(start), Some(end)) = (start, end)
                && start <= end
                && !ranges.contains(&(start, end))
            {
                ranges.push((start, end));
            }
        }
    }
    ranges
}

fn judge_ranges(
    serial: u64,
    ranges: &[(u64, u64)],
    match_confidence: i64,
) -> Option<Verdict> {
    if ranges.is_empty() {
        return None;
    }

    if let Some((start, end)) = ranges
        .iter()
        .find(|(start, end)| (*start..=*end).contains(&serial))
    {
        return Some(local(
            true,
            match_confidence,
            format!("Serial number {serial} is within the affected range {start}-{end}"),
        ));
    }

    let listed = ranges
        .iter()
        .map(|(start, end)| format!("{start}-{end}"))
        .collect::<Vec<_>>()
        .join(", ");

    Some(local(
        false,
        CONFIDENCE_RANGE_MISS,
        format!("Serial number {serial} is outside the affected range(s) {listed}"),
    ))
}

fn explicit_range(input: &RuleInput) -> Option<Verdict> {
    let serial = input.numeric_serial?;
    let ranges = collect_ranges(&[&*THROUGH_RANGE, &*TO_RANGE], &input.text);
    judge_ranges(serial, &ranges, CONFIDENCE_RANGE_MATCH)
}

fn blanket_applicability(input: &RuleInput) -> Option<Verdict> {
    let phrase = BLANKET.find(&input.text)?;
    Some(local(
        true,
        CONFIDENCE_BLANKET,
        format!(
            "Directive applies to {} regardless of serial number",
            phrase.as_str().to_lowercase()
        ),
    ))
}

fn serial_listed(input: &RuleInput) -> Option<Verdict> {
    if input.serial.chars().count() < MIN_LITERAL_SERIAL_CHARS || !input.text.contains(&input.serial)
    {
        return None;
    }
    Some(local(
        true,
        CONFIDENCE_SERIAL_LISTED,
        format!("Serial number {} is listed in the directive text", input.serial),
    ))
}

fn model_named(input: &RuleInput) -> Option<Verdict> {
    if input.model.chars().count() < 2 {
        return None;
    }

    let clean_mention = token_positions(&input.text, &input.model).into_iter().any(|pos| {
        let window = window_around(&input.text, pos, input.model.len(), EXCLUSION_WINDOW_CHARS);
        find_exclusion(window).is_none()
    });

    clean_mention.then(|| {
        local(
            true,
            CONFIDENCE_MODEL_NAMED,
            format!(
                "Model {} is named in the directive without exclusion language",
                input.model
            ),
        )
    })
}

fn exclusion_phrase(input: &RuleInput) -> Option<Verdict> {
    let phrase = find_exclusion(&input.text)?;
    Some(local(
        false,
        CONFIDENCE_EXCLUDED,
        format!(
            "Directive text contains exclusion language (\"{}\")",
            phrase.to_lowercase()
        ),
    ))
}

fn hyphen_range(input: &RuleInput) -> Option<Verdict> {
    let serial = input.numeric_serial?;
    let ranges = collect_ranges(&[&*HYPHEN_RANGE], &input.text);
    judge_ranges(serial, &ranges, CONFIDENCE_ALT_RANGE_MATCH)
}

fn find_exclusion(text: &str) -> Option<&'static str> {
    EXCLUSION_PHRASES
        .iter()
        .copied()
        .find(|phrase| text.contains(phrase))
}

/// Byte offsets of `needle` in `haystack` not embedded in a longer alphanumeric token
fn token_positions(haystack: &str, needle: &str) -> Vec<usize> {
    haystack
        .match_indices(needle)
        .filter(|(pos, _)| {
            let before = haystack[..*pos].chars().next_back();
            let after = haystack[pos + needle.len()..].chars().next();
            !before.is_some_and(|c| c.is_alphanumeric())
                && !after.is_some_and(|c| c.is_alphanumeric())
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Slice of `text` extending up to `radius` bytes around a match, on char boundaries
fn window_around(text: &str, pos: usize, len: usize, radius: usize) -> &str {
    let mut start = pos.saturating_sub(radius);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (pos + len + radius).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(serial: &str, model: &str, text: &str) -> Verdict {
        LocalClassifier::default().classify_text(&ClassificationContext {
            serial_number: serial,
            model,
            ad_number: "2020-01-01",
            text,
        })
    }

    #[test]
    fn test_empty_text_is_insufficient() {
        assert_eq!(classify("36617", "172N", ""), Verdict::insufficient_data());
        assert_eq!(classify("36617", "172N", "   short  "), Verdict::insufficient_data());
    }

    #[test]
    fn test_through_range_inside() {
        let verdict = classify("36617", "172N", "Serial numbers 36216 through 36769 are affected");
        assert!(verdict.applicable);
        assert_eq!(verdict.confidence, 95);
        assert!(verdict.reasoning.contains("36216-36769"));
    }

    #[test]
    fn test_through_range_boundaries_and_outside() {
        let text = "This AD applies to serial numbers 100 through 200 only.";
        assert_eq!(classify("100", "150", text).confidence, 95);
        assert_eq!(classify("200", "150", text).confidence, 95);

        let below = classify("99", "150", text);
        assert!(!below.applicable);
        assert_eq!(below.confidence, 90);

        let above = classify("201", "150", text);
        assert!(!above.applicable);
        assert_eq!(above.confidence, 90);
        assert!(above.reasoning.contains("100-200"));
    }

    #[test]
    fn test_range_property_over_grid() {
        for (start, end) in [(1u64, 1u64), (10, 20), (17260001, 17274009)] {
            let text = format!("Affected airplanes: serial numbers {start} through {end}.");
            for serial in [start, (start + end) / 2, end] {
                let verdict = classify(&serial.to_string(), "172", &text);
                assert_eq!((verdict.applicable, verdict.confidence), (true, 95));
            }
            for serial in [start.saturating_sub(1), end + 1] {
                if serial >= start && serial <= end {
                    continue;
                }
                let verdict = classify(&serial.to_string(), "172", &text);
                assert_eq!((verdict.applicable, verdict.confidence), (false, 90));
            }
        }
    }

    #[test]
    fn test_multiple_ranges_any_match() {
        let text = "Serial numbers 17269462 through 17276999, and 17261446 through 17262000.";
        let verdict = classify("17261500", "172N", text);
        assert!(verdict.applicable);
        assert!(verdict.reasoning.contains("17261446-17262000"));
    }

    #[test]
    fn test_to_range_requires_serial_prefix() {
        let verdict = classify("150", "172", "Serial Numbers 100 to 200 must be inspected now.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 95));

        // "to" without a serial prefix is not a range
        let verdict = classify("150", "PA-28", "Torque the bolts from 100 to 200 inch-pounds.");
        assert_eq!(verdict.confidence, 30);
    }

    #[test]
    fn test_non_numeric_serial_skips_ranges() {
        let verdict = classify(
            "172S8001",
            "172S",
            "Model 172S serial numbers 100 through 200 are affected.",
        );
        // falls through to the model rule
        assert_eq!((verdict.applicable, verdict.confidence), (true, 75));
    }

    #[test]
    fn test_range_outranks_blanket() {
        let text = "All airplanes with serial numbers 100 through 200 are affected.";
        let verdict = classify("500", "150", text);
        assert_eq!((verdict.applicable, verdict.confidence), (false, 90));
    }

    #[test]
    fn test_blanket() {
        let verdict = classify("17269462", "172N", "This AD applies to all Cessna airplanes.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 90));

        let verdict = classify("ABC", "150", "Applicable to all serial numbers of the type.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 90));
    }

    #[test]
    fn test_serial_listed() {
        let text = "Affected aircraft: 17269462, 17269501, and 17269777 require inspection.";
        let verdict = classify("17269501", "PA-28", text);
        assert_eq!((verdict.applicable, verdict.confidence), (true, 85));
    }

    #[test]
    fn test_short_serial_not_matched_literally() {
        let verdict = classify("12", "PA-28", "Inspect 12 fasteners on the wing attach fitting.");
        assert_eq!(verdict.confidence, 30);
    }

    #[test]
    fn test_model_named() {
        let verdict = classify("17269462", "Model 172N", "Cessna Model 172N airplanes require inspection.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 75));
    }

    #[test]
    fn test_model_inside_longer_token_ignored() {
        let verdict = classify("999", "172", "Cessna Model 172RG airplanes require inspection.");
        assert_eq!(verdict.confidence, 30);
    }

    #[test]
    fn test_model_near_exclusion_falls_to_exclusion_rule() {
        let verdict = classify(
            "17269462",
            "172N",
            "Model 172N airplanes are not affected by this directive requirement.",
        );
        assert_eq!((verdict.applicable, verdict.confidence), (false, 70));
    }

    #[test]
    fn test_exclusion_without_model() {
        let verdict = classify("17269462", "172N", "This AD does not apply to float-equipped airplanes.");
        assert_eq!((verdict.applicable, verdict.confidence), (false, 70));
    }

    #[test]
    fn test_hyphen_range() {
        let verdict = classify("150", "PA-28", "Applies to S/N range 100-200 for the fuel selector.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 92));

        let verdict = classify("150", "PA-28", "Applies to S/N 100\u{2013}200 for the fuel selector.");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 92));

        let verdict = classify("250", "PA-28", "Applies to S/N range 100-200 for the fuel selector.");
        assert_eq!((verdict.applicable, verdict.confidence), (false, 90));
    }

    #[test]
    fn test_default_is_undetermined() {
        let verdict = classify("17269462", "172N", "Replace the fuel cap gaskets at next annual inspection.");
        assert!(!verdict.applicable);
        assert_eq!(verdict.confidence, 30);
        assert!(verdict.reasoning.contains("could not be determined"));
    }

    #[test]
    fn test_case_insensitive() {
        let verdict = classify("36617", "172n", "serial numbers 36216 THROUGH 36769 are affected");
        assert_eq!((verdict.applicable, verdict.confidence), (true, 95));
    }

    #[test]
    fn test_window_on_multibyte_text() {
        let text = "é".repeat(10) + "172N" + &"ü".repeat(10);
        let window = window_around(&text, 20, 4, 3);
        assert!(window.contains("172N"));
    }
}
