//! Heading detection for structural outlines.
//!
//! A heuristic text classifier, deliberately separate from chunking so the
//! pattern list and thresholds can be tuned without touching segmentation.
//! False negatives are acceptable; length and pattern gating keeps false
//! positives rare.

use regex::Regex;

use crate::document::OutlineEntry;

/// Detects heading-like lines and records them as outline entries.
///
/// A line counts as a heading when it is shorter than `max_heading_len` and
/// matches one of:
///
/// - a numbered section prefix (`1. Title`, `2.3 Title`)
/// - a `Chapter N` / `Section N` prefix (case-insensitive)
/// - an ALL-CAPS line (every cased character uppercase)
///
/// # Example
///
/// ```rust,ignore
/// use quizforge_rag::HeadingDetector;
///
/// let detector = HeadingDetector::new();
/// let outline = detector.detect(&document.pages);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    max_heading_len: usize,
    patterns: Vec<Regex>,
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingDetector {
    /// Maximum line length (characters) considered for headings.
    const DEFAULT_MAX_HEADING_LEN: usize = 100;

    /// Create a detector with the default pattern list and length gate.
    pub fn new() -> Self {
        let patterns = [
            r"^\d+(\.\d+)*\.?\s+\S",
            r"(?i)^chapter\s+\d+",
            r"(?i)^section\s+\d+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("built-in heading pattern"))
        .collect();

        Self { max_heading_len: Self::DEFAULT_MAX_HEADING_LEN, patterns }
    }

    /// Override the maximum heading length gate.
    pub fn with_max_heading_len(mut self, len: usize) -> Self {
        self.max_heading_len = len;
        self
    }

    /// Add a custom heading pattern to the list.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Whether a single trimmed line looks like a heading.
    fn is_heading(&self, line: &str) -> bool {
        if line.is_empty() || line.chars().count() >= self.max_heading_len {
            return false;
        }
        if self.patterns.iter().any(|p| p.is_match(line)) {
            return true;
        }
        // ALL-CAPS gate: at least one cased character, none lowercase.
        let mut has_upper = false;
        for c in line.chars() {
            if c.is_lowercase() {
                return false;
            }
            has_upper |= c.is_uppercase();
        }
        has_upper
    }

    /// Scan each page's lines and collect headings in first-seen order.
    ///
    /// Pages with no detected heading contribute no entries. Page numbers
    /// are 1-based.
    pub fn detect(&self, pages: &[String]) -> Vec<OutlineEntry> {
        let mut outline = Vec::new();
        for (page_index, page) in pages.iter().enumerate() {
            for line in page.lines() {
                let line = line.trim();
                if self.is_heading(line) {
                    outline.push(OutlineEntry {
                        page: page_index + 1,
                        heading: line.to_string(),
                    });
                }
            }
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn detects_numbered_chapter_and_caps_headings() {
        let detector = HeadingDetector::new();
        let outline = detector.detect(&pages(&[
            "1. Introduction\nSome body text that goes on.\n1.1 Scope\nmore text",
            "Chapter 2\nbody\nRESULTS AND DISCUSSION\nbody again",
        ]));

        let headings: Vec<(usize, &str)> =
            outline.iter().map(|e| (e.page, e.heading.as_str())).collect();
        assert_eq!(
            headings,
            vec![
                (1, "1. Introduction"),
                (1, "1.1 Scope"),
                (2, "Chapter 2"),
                (2, "RESULTS AND DISCUSSION"),
            ]
        );
    }

    #[test]
    fn body_text_is_not_a_heading() {
        let detector = HeadingDetector::new();
        let outline = detector.detect(&pages(&[
            "This is an ordinary sentence that simply describes something.",
        ]));
        assert!(outline.is_empty());
    }

    #[test]
    fn long_caps_lines_are_gated_out() {
        let detector = HeadingDetector::new();
        let shout = "A".repeat(120);
        let outline = detector.detect(&pages(&[shout.as_str()]));
        assert!(outline.is_empty());
    }

    #[test]
    fn pages_without_headings_contribute_nothing() {
        let detector = HeadingDetector::new();
        let outline = detector.detect(&pages(&[
            "plain text only",
            "1. The Only Heading\nbody",
            "more plain text",
        ]));
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].page, 2);
    }

    #[test]
    fn custom_pattern_extends_the_list() {
        let detector =
            HeadingDetector::new().with_pattern(Regex::new(r"(?i)^appendix\s+[a-z]").unwrap());
        let outline = detector.detect(&pages(&["Appendix B\nbody text here"]));
        assert_eq!(outline[0].heading, "Appendix B");
    }
}
