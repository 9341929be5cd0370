//! Snippet generation: a bounded excerpt around the first matched term,
//! with every in-window occurrence wrapped in highlight markers

use regex::{Regex, RegexBuilder};

/// Default excerpt window in characters
pub const DEFAULT_WINDOW: usize = 160;

/// Highlight delimiter (markdown bold; results are read by an LLM client)
const MARK: &str = "**";

/// Build a case-insensitive pattern matching any of the terms. Longer
/// terms come first in the alternation so a stem never cuts short the
/// highlight of a full word it prefixes ("valid" vs "validation").
fn term_pattern(terms: &[String]) -> Option<Regex> {
    let mut escaped: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()));
    RegexBuilder::new(&escaped.join("|"))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Move a byte offset back to the nearest char boundary
fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Move a byte offset forward to the nearest char boundary
fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Extract a bounded excerpt of `text` centered on the first occurrence of
/// any matched term, with ellipsis markers where truncated and every
/// in-window occurrence highlighted.
///
/// When no term occurs in the field (the match may have come from another
/// field), returns an ellipsis-truncated prefix without highlighting.
pub fn make_snippet(text: &str, terms: &[String], window: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let pattern = term_pattern(terms);
    let first_match = pattern
        .as_ref()
        .and_then(|re| re.find(text))
        .map(|m| m.start());

    let (start, end) = match first_match {
        Some(pos) => {
            let start = floor_boundary(text, pos.saturating_sub(window / 2));
            let end = ceil_boundary(text, (start + window).min(text.len()));
            (start, end)
        }
        None => (0, ceil_boundary(text, window.min(text.len()))),
    };

    let mut excerpt = text[start..end].to_string();
    if first_match.is_some() {
        if let Some(re) = pattern {
            excerpt = re
                .replace_all(&excerpt, |caps: &regex::Captures| {
                    format!("{MARK}{}{MARK}", &caps[0])
                })
                .to_string();
        }
    }

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&excerpt);
    if end < text.len() {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn highlights_matched_term() {
        let s = make_snippet("Use the Button component here", &terms(&["button"]), 160);
        assert!(s.contains("**Button**"));
        assert!(!s.starts_with("..."));
    }

    #[test]
    fn highlights_every_occurrence_in_window() {
        let s = make_snippet("button styles for button groups", &terms(&["button"]), 160);
        assert_eq!(s.matches("**button**").count(), 2);
    }

    #[test]
    fn truncates_around_match_with_ellipses() {
        let long = format!("{} dropdown {}", "x".repeat(300), "y".repeat(300));
        let s = make_snippet(&long, &terms(&["dropdown"]), 80);
        assert!(s.starts_with("..."));
        assert!(s.ends_with("..."));
        assert!(s.contains("**dropdown**"));
        // Window plus markers and ellipses stays well under the full text
        assert!(s.len() < 120);
    }

    #[test]
    fn no_match_returns_truncated_prefix() {
        let long = "a".repeat(400);
        let s = make_snippet(&long, &terms(&["missing"]), 100);
        assert!(s.ends_with("..."));
        assert!(!s.contains("**"));
        assert!(s.len() <= 103);
    }

    #[test]
    fn short_field_without_match_is_returned_whole() {
        let s = make_snippet("plain text", &terms(&["missing"]), 100);
        assert_eq!(s, "plain text");
    }

    #[test]
    fn empty_terms_do_not_highlight() {
        let s = make_snippet("some text", &[], 100);
        assert_eq!(s, "some text");
    }

    #[test]
    fn longer_term_wins_over_its_prefix() {
        let s = make_snippet(
            "form validation rules",
            &terms(&["valid", "validation"]),
            160,
        );
        assert!(s.contains("**validation**"));
        assert!(!s.contains("**valid**ation"));
    }

    #[test]
    fn respects_char_boundaries() {
        let text = "héllo wörld ünïcode button text";
        let s = make_snippet(text, &terms(&["button"]), 10);
        assert!(s.contains("**button**"));
    }
}
