//! Placeholder token grammar.
//!
//! Plain tokens look like `{{ name }}`; section tokens carry `#` (open) or
//! `/` (close) after the opening braces. Whitespace is allowed around every
//! part of the token.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([#/]?)\s*(\w+)\s*\}\}").unwrap());

static SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*[#/]\s*\w+\s*\}\}").unwrap());

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Kind of placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// `{{name}}`
    Plain,
    /// `{{#name}}`
    SectionOpen,
    /// `{{/name}}`
    SectionClose,
}

/// A placeholder token found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Identifier inside the braces
    pub name: String,
    /// Token family
    pub kind: PlaceholderKind,
    /// Token text as written
    pub raw: String,
}

impl Placeholder {
    /// Whether this is a section open or close token.
    pub fn is_section(&self) -> bool {
        !matches!(self.kind, PlaceholderKind::Plain)
    }
}

/// Net change in brace balance contributed by `text`.
///
/// Counts non-overlapping `{{` minus non-overlapping `}}`.
pub fn brace_delta(text: &str) -> i64 {
    text.matches(OPEN).count() as i64 - text.matches(CLOSE).count() as i64
}

/// Whether the text holds at least one section token.
pub fn contains_section(text: &str) -> bool {
    SECTION.is_match(text)
}

/// Section tokens in order of appearance, verbatim.
pub fn section_tokens(text: &str) -> Vec<&str> {
    SECTION.find_iter(text).map(|m| m.as_str()).collect()
}

/// All placeholder tokens in order of appearance.
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| {
            let kind = match caps.get(1).map_or("", |m| m.as_str()) {
                "#" => PlaceholderKind::SectionOpen,
                "/" => PlaceholderKind::SectionClose,
                _ => PlaceholderKind::Plain,
            };
            Placeholder {
                name: caps[2].to_string(),
                kind,
                raw: caps[0].to_string(),
            }
        })
        .collect()
}

/// Section tokens that have no partner.
///
/// A close must match the innermost open section; closes that do not are
/// reported, as are opens left at the end.
pub fn unmatched_sections(placeholders: &[Placeholder]) -> Vec<Placeholder> {
    let mut open: Vec<&Placeholder> = Vec::new();
    let mut unmatched = Vec::new();
    for placeholder in placeholders {
        match placeholder.kind {
            PlaceholderKind::Plain => {}
            PlaceholderKind::SectionOpen => open.push(placeholder),
            PlaceholderKind::SectionClose => match open.last() {
                Some(top) if top.name == placeholder.name => {
                    open.pop();
                }
                _ => unmatched.push(placeholder.clone()),
            },
        }
    }
    unmatched.extend(open.into_iter().cloned());
    unmatched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brace_delta() {
        assert_eq!(brace_delta("{{NA"), 1);
        assert_eq!(brace_delta("ME}}"), -1);
        assert_eq!(brace_delta("{{NAME}}"), 0);
        assert_eq!(brace_delta("plain"), 0);
        assert_eq!(brace_delta("{{{"), 1);
    }

    #[test]
    fn test_section_detection() {
        assert!(contains_section("{{#ITEMS}}"));
        assert!(contains_section("{{ / ITEMS }}"));
        assert!(contains_section("Items: {{#ITEMS}}"));
        assert!(!contains_section("{{ITEMS}}"));
        assert!(!contains_section("{{#}}"));
    }

    #[test]
    fn test_section_tokens_verbatim() {
        assert_eq!(
            section_tokens("a {{#A}} b {{ /A }}"),
            vec!["{{#A}}", "{{ /A }}"]
        );
    }

    #[test]
    fn test_find_placeholders() {
        let found = find_placeholders("Dear {{ NAME }}, {{#ITEMS}}{{title}}{{/ITEMS}}");
        let kinds: Vec<_> = found.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PlaceholderKind::Plain,
                PlaceholderKind::SectionOpen,
                PlaceholderKind::Plain,
                PlaceholderKind::SectionClose,
            ]
        );
        assert_eq!(found[0].name, "NAME");
        assert_eq!(found[0].raw, "{{ NAME }}");
        assert!(found[1].is_section());
    }

    #[test]
    fn test_unmatched_sections() {
        let balanced = find_placeholders("{{#A}}{{#B}}{{/B}}{{/A}}");
        assert!(unmatched_sections(&balanced).is_empty());

        let stray = find_placeholders("{{/A}}{{#B}}");
        let names: Vec<_> = unmatched_sections(&stray)
            .into_iter()
            .map(|p| p.raw)
            .collect();
        assert_eq!(names, vec!["{{/A}}", "{{#B}}"]);
    }

    #[test]
    fn test_inverted_sections_are_not_tokens() {
        assert!(!contains_section("{{^EMPTY}}"));

        // Only the close is a section token, so inspection flags it.
        let found = find_placeholders("{{^EMPTY}}none{{/EMPTY}}");
        let unmatched: Vec<_> = unmatched_sections(&found)
            .into_iter()
            .map(|p| p.raw)
            .collect();
        assert_eq!(unmatched, vec!["{{/EMPTY}}"]);
    }
}
