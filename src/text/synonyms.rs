//! Synonym dictionary for query expansion
//!
//! Process-wide, read-only vocabulary seeded at startup. Lookup is exact
//! lowercase match against group membership; expanded terms flow through the
//! regular tokenizer afterwards, so no stemming happens at this layer.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Synonym groups - words in the same group are considered equivalent
/// for query expansion
pub const SYNONYM_GROUPS: &[&[&str]] = &[
    &["button", "btn", "cta"],
    &["input", "textfield", "textbox", "field"],
    &["modal", "dialog", "popup", "overlay"],
    &["dropdown", "select", "combobox", "picker"],
    &["card", "panel", "tile"],
    &["theme", "theming", "styling", "colors"],
    &["component", "widget", "element", "control"],
    &["accessibility", "a11y", "aria"],
    &["animation", "transition", "motion"],
    &["responsive", "mobile", "adaptive", "breakpoint"],
    &["form", "fieldset"],
    &["chart", "graph", "plot", "visualization"],
    &["table", "datagrid", "grid"],
    &["navigation", "nav", "navbar", "sidebar", "menu"],
    &["toast", "notification", "snackbar"],
    &["avatar", "profile"],
    &["tooltip", "hint", "popover"],
    &["spinner", "loader", "loading", "skeleton"],
    &["tabs", "tabbed"],
    &["slider", "range"],
];

lazy_static! {
    /// term -> members of its group, built once from SYNONYM_GROUPS
    static ref SYNONYM_MAP: HashMap<&'static str, &'static [&'static str]> = {
        let mut map = HashMap::new();
        for group in SYNONYM_GROUPS {
            for &word in *group {
                map.insert(word, *group);
            }
        }
        map
    };
}

/// Expand one term to itself plus its synonym group.
///
/// Lookup is case-insensitive exact match; unknown terms expand to just
/// themselves. The original term always comes first.
pub fn expand_term(term: &str) -> Vec<String> {
    let term_lower = term.to_lowercase();
    let mut expanded = vec![term_lower.clone()];

    if let Some(group) = SYNONYM_MAP.get(term_lower.as_str()) {
        for &word in *group {
            if word != term_lower {
                expanded.push(word.to_string());
            }
        }
    }

    expanded
}

/// Expand a raw query into an OR-combined term collection.
///
/// Splits on whitespace, case-folds, and unions in each word's synonym
/// expansion, preserving the original word before its synonyms. Purely
/// additive: the result always contains every original word.
pub fn expand_query(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in raw.split_whitespace() {
        for expanded in expand_term(word) {
            if !terms.contains(&expanded) {
                terms.push(expanded);
            }
        }
    }
    terms
}
