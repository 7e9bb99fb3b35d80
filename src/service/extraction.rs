//! Applicability text extraction from AD documents
//!
//! Strips markup from a fetched document and isolates the section most likely
//! to state which aircraft are affected:
//! 1. The regulatory text of the AD
//! 2. The applicability paragraph
//! 3. Otherwise the leading part of the document

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Node};

use crate::model::ExtractionConfig;

/// Elements whose text never reaches the classifier
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static REGULATORY_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bregulatory\s+text\b(.*?)(?:\(\w\)\s*)?(?:\brelated\s+information\b|\bmaterial\s+incorporated\s+by\s+reference\b|\bissued\s+(?:in|on)\b|\z)",
    )
    .expect("regulatory section pattern is valid")
});

static APPLICABILITY_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bapplicability\b(.*?)(?:\(\w\)\s*)?(?:\bsubject\b|\bunsafe\s+condition\b|\beffective\s+date\b|\bcompliance\b|\z)",
    )
    .expect("applicability section pattern is valid")
});

pub struct TextExtractor {
    config: ExtractionConfig,
}

impl TextExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Reduce a raw document to bounded applicability text. Never fails; may be empty.
    pub fn extract(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let clean = strip_markup(raw);

        if let Some(section) = self.find_section(&REGULATORY_SECTION, &clean) {
            tracing::debug!(chars = section.chars().count(), "Using regulatory text section");
            return section;
        }

        if let Some(section) = self.find_section(&APPLICABILITY_SECTION, &clean) {
            tracing::debug!(chars = section.chars().count(), "Using applicability section");
            return section;
        }

        truncate_chars(&clean, self.config.fallback_chars)
    }

    /// Longest match of `pattern` that clears the minimum length, truncated
    fn find_section(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|section| section.chars().count() > self.config.min_section_chars)
            .max_by_key(|section| section.chars().count())
            .map(|section| truncate_chars(section, self.config.max_section_chars))
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

/// Drop script/style content and tags, decode entities, collapse whitespace
pub fn strip_markup(raw: &str) -> String {
    let document = Html::parse_document(raw);

    let pieces: Vec<&str> = document
        .tree
        .nodes()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let skipped = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                });
                (!skipped).then_some(&**text)
            }
            _ => None,
        })
        .collect();

    collapse_whitespace(&pieces.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(words: usize) -> String {
        vec!["inspect the elevator trim tab actuator"; words].join(" ")
    }

    #[test]
    fn test_strip_markup_removes_scripts_and_entities() {
        let html = r#"<html><head><style>p { color: red; }</style>
            <script>var serial = "99999";</script></head>
            <body><p>Serial&nbsp;numbers&amp;models</p>
            <div>  Cessna
            172N </div></body></html>"#;

        let clean = strip_markup(html);
        assert_eq!(clean, "Serial numbers&models Cessna 172N");
    }

    #[test]
    fn test_plain_text_passes_through() {
        let extractor = TextExtractor::default();
        assert_eq!(
            extractor.extract("Serial numbers 36216 through 36769 are affected"),
            "Serial numbers 36216 through 36769 are affected"
        );
    }

    #[test]
    fn test_empty_input() {
        let extractor = TextExtractor::default();
        assert_eq!(extractor.extract(""), "");
        assert_eq!(extractor.extract("<html><script>x()</script></html>"), "");
    }

    #[test]
    fn test_regulatory_section_preferred() {
        let html = format!(
            "<h1>Summary</h1><p>Applicability {body} Subject</p>\
             <h2>Regulatory Text</h2><p>This AD applies to Model 172N airplanes, \
             serial numbers 17260001 through 17274009. {body}</p>\
             <h2>Related Information</h2><p>Contact the FAA.</p>",
            body = filler(5)
        );

        let text = TextExtractor::default().extract(&html);
        assert!(text.starts_with("This AD applies to Model 172N airplanes"));
        assert!(!text.contains("Related Information"));
        assert!(!text.contains("Contact the FAA"));
    }

    #[test]
    fn test_applicability_section_stops_at_next_heading() {
        let html = format!(
            "<p>Intro text.</p><h3>(c) Applicability</h3>\
             <p>This AD applies to Cessna Model 150 airplanes. {body}</p>\
             <h3>(d) Subject</h3><p>Joint Aircraft System Component code 5510.</p>",
            body = filler(4)
        );

        let text = TextExtractor::default().extract(&html);
        assert!(text.starts_with("This AD applies to Cessna Model 150"));
        assert!(!text.contains("5510"));
    }

    #[test]
    fn test_short_section_rejected_and_fallback_is_bounded() {
        let config = ExtractionConfig {
            min_section_chars: 100,
            max_section_chars: 6000,
            fallback_chars: 50,
        };
        let html = format!(
            "<p>Applicability: see below. Subject</p><p>{}</p>",
            filler(20)
        );

        let text = TextExtractor::new(config).extract(&html);
        assert_eq!(text.chars().count(), 50);
        assert!(text.starts_with("Applicability: see below."));
    }

    #[test]
    fn test_section_is_truncated() {
        let config = ExtractionConfig {
            min_section_chars: 10,
            max_section_chars: 40,
            fallback_chars: 4000,
        };
        let text = TextExtractor::new(config).extract(&format!("Regulatory Text {}", filler(10)));
        assert_eq!(text.chars().count(), 40);
        assert!(text.starts_with("inspect the elevator"));
    }
}
