//! Search pattern generation for glossary terms.
//!
//! A term such as `TDD (Test-Driven Development)` is mentioned in prose as
//! `TDD`, as `Test-Driven Development` or by its identifier `tdd`. Each of
//! those spellings becomes an independent [`Pattern`]; any one of them
//! matching counts as an occurrence of the term.

use std::sync::LazyLock;

use regex::{Matches, Regex, RegexBuilder};
use serde::Serialize;

use crate::GlossError;

/// Leading run of capitals directly followed by an opening parenthesis.
static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)\s*\(").expect("Invalid acronym regex"));

/// First parenthesized segment of a display name.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("Invalid parenthetical regex"));

/// Every parenthesized segment, including the whitespace in front of it.
static PARENTHETICAL_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("Invalid parenthetical regex"));

/// Identifiers excluded from identifier matching unless configured otherwise.
pub const DEFAULT_RESERVED_IDS: &[&str] = &["e2e", "api"];

/// How a pattern was derived from its term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Word-bounded uppercase acronym taken from the display name.
    Acronym,
    /// Exact text found between parentheses in the display name.
    Phrase,
    /// Word-bounded identifier; `-` also matches whitespace or nothing.
    Identifier,
    /// Display name with parenthetical segments removed.
    CleanName,
}

/// A case-insensitive matcher for one spelling of a term.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
    literal: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern of the given kind for a plain-text literal.
    pub fn new(kind: PatternKind, literal: impl Into<String>) -> Result<Self, GlossError> {
        let literal = literal.into();
        let source = match kind {
            PatternKind::Acronym => format!(r"\b{}\b", regex::escape(&literal)),
            PatternKind::Phrase | PatternKind::CleanName => regex::escape(&literal),
            PatternKind::Identifier => {
                let body = literal
                    .split('-')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"[-\s]?");
                format!(r"\b{}\b", body)
            }
        };

        let regex = RegexBuilder::new(&source).case_insensitive(true).build()?;

        Ok(Self {
            kind,
            literal,
            regex,
        })
    }

    /// Returns how this pattern was derived.
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Returns the plain text this pattern was built from, before escaping.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the compiled regular expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Iterates over all non-overlapping matches in `text`.
    pub fn find_iter<'r, 'h>(&'r self, text: &'h str) -> Matches<'r, 'h> {
        self.regex.find_iter(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.literal == other.literal && self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

/// Strips every parenthetical segment from a display name.
///
/// `"TDD (Test-Driven Development)"` becomes `"TDD"`.
pub fn clean_name(display_name: &str) -> String {
    PARENTHETICAL_STRIP_RE
        .replace_all(display_name, "")
        .trim()
        .to_string()
}

/// Derives the ordered list of search patterns for a term.
///
/// The rules run independently and in a fixed order (acronym, parenthetical
/// phrase, identifier, clean name), so the same input always yields the same
/// list. `reserved_ids` lists identifiers too ambiguous to match on their own.
pub fn generate_patterns(
    display_name: &str,
    id: &str,
    reserved_ids: &[String],
) -> Result<Vec<Pattern>, GlossError> {
    let mut patterns: Vec<Pattern> = Vec::new();

    if let Some(caps) = ACRONYM_RE.captures(display_name) {
        push_distinct(&mut patterns, Pattern::new(PatternKind::Acronym, &caps[1])?);
    }

    if let Some(caps) = PARENTHETICAL_RE.captures(display_name) {
        push_distinct(&mut patterns, Pattern::new(PatternKind::Phrase, &caps[1])?);
    }

    if !id.is_empty() && !reserved_ids.iter().any(|reserved| reserved == id) {
        push_distinct(&mut patterns, Pattern::new(PatternKind::Identifier, id)?);
    }

    let clean = clean_name(display_name);
    if !clean.is_empty() && !patterns.iter().any(|p| p.literal() == clean) {
        push_distinct(&mut patterns, Pattern::new(PatternKind::CleanName, clean)?);
    }

    Ok(patterns)
}

fn push_distinct(patterns: &mut Vec<Pattern>, pattern: Pattern) {
    if !patterns.iter().any(|p| p.as_str() == pattern.as_str()) {
        patterns.push(pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn reserved() -> Vec<String> {
        DEFAULT_RESERVED_IDS.iter().map(|s| s.to_string()).collect()
    }

    fn hits(pattern: &Pattern, text: &str) -> bool {
        pattern.find_iter(text).next().is_some()
    }

    fn literals(patterns: &[Pattern]) -> Vec<(PatternKind, &str)> {
        patterns.iter().map(|p| (p.kind(), p.literal())).collect()
    }

    #[test]
    fn test_acronym_with_full_form() {
        let patterns =
            generate_patterns("TDD (Test-Driven Development)", "tdd", &reserved()).unwrap();

        assert_eq!(
            literals(&patterns),
            vec![
                (PatternKind::Acronym, "TDD"),
                (PatternKind::Phrase, "Test-Driven Development"),
                (PatternKind::Identifier, "tdd"),
            ]
        );
    }

    #[test]
    fn test_acronym_patterns_match_each_spelling() {
        let patterns =
            generate_patterns("TDD (Test-Driven Development)", "tdd", &reserved()).unwrap();

        assert!(hits(&patterns[0], "We use TDD daily"));
        assert!(hits(&patterns[1], "practising test-driven development"));
        assert!(hits(&patterns[2], "see tdd"));
    }

    #[test]
    fn test_acronym_is_word_bounded() {
        let patterns =
            generate_patterns("TDD (Test-Driven Development)", "tdd", &reserved()).unwrap();

        assert!(!hits(&patterns[0], "ATDDX"));
    }

    #[test]
    fn test_plain_name_yields_identifier_and_clean_name() {
        let patterns = generate_patterns("React", "react", &reserved()).unwrap();

        assert_eq!(
            literals(&patterns),
            vec![
                (PatternKind::Identifier, "react"),
                (PatternKind::CleanName, "React"),
            ]
        );
    }

    #[test]
    fn test_clean_name_skipped_when_identical_to_identifier() {
        let patterns = generate_patterns("typescript", "typescript", &reserved()).unwrap();

        assert_eq!(literals(&patterns), vec![(PatternKind::Identifier, "typescript")]);
    }

    #[rstest]
    #[case::hyphen("living-docs", "living-docs")]
    #[case::space("living docs", "living-docs")]
    #[case::joined("livingdocs", "living-docs")]
    #[case::uppercase("Living Docs", "living-docs")]
    fn test_identifier_tolerates_hyphen_variants(#[case] text: &str, #[case] id: &str) {
        let patterns = generate_patterns("Living Documentation", id, &reserved()).unwrap();
        let identifier = patterns
            .iter()
            .find(|p| p.kind() == PatternKind::Identifier)
            .unwrap();

        assert!(hits(identifier, text), "'{}' should match", text);
    }

    #[rstest]
    #[case::e2e("E2E (End-to-End Testing)", "e2e")]
    #[case::api("API (Application Programming Interface)", "api")]
    fn test_reserved_ids_skip_identifier_pattern(#[case] name: &str, #[case] id: &str) {
        let patterns = generate_patterns(name, id, &reserved()).unwrap();

        assert!(
            patterns
                .iter()
                .all(|p| p.kind() != PatternKind::Identifier)
        );
    }

    #[test]
    fn test_reserved_ids_are_configurable() {
        let patterns = generate_patterns("API (Application Programming Interface)", "api", &[])
            .unwrap();

        assert!(
            patterns
                .iter()
                .any(|p| p.kind() == PatternKind::Identifier)
        );
    }

    #[test]
    fn test_phrase_is_escaped_literally() {
        let patterns = generate_patterns("Regex (a.b+c)", "regex", &reserved()).unwrap();
        let phrase = patterns
            .iter()
            .find(|p| p.kind() == PatternKind::Phrase)
            .unwrap();

        assert!(hits(phrase, "written as a.b+c here"));
        assert!(!hits(phrase, "written as axbbc here"));
    }

    #[test]
    fn test_clean_name_removes_parenthetical_and_trims() {
        assert_eq!(clean_name("Continuous Integration (CI)"), "Continuous Integration");
        assert_eq!(clean_name("  Style (v1) Guide (beta) "), "Style Guide");
        assert_eq!(clean_name("(Only)"), "");
    }

    #[test]
    fn test_lowercase_leading_word_has_no_acronym() {
        let patterns =
            generate_patterns("Continuous Integration (CI)", "ci", &reserved()).unwrap();

        assert_eq!(
            literals(&patterns),
            vec![
                (PatternKind::Phrase, "CI"),
                (PatternKind::Identifier, "ci"),
                (PatternKind::CleanName, "Continuous Integration"),
            ]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let first = generate_patterns("ADR (Architecture Decision Record)", "adr", &reserved())
            .unwrap();
        let second = generate_patterns("ADR (Architecture Decision Record)", "adr", &reserved())
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_identifier_is_ignored() {
        let patterns = generate_patterns("Glossary", "", &reserved()).unwrap();

        assert_eq!(literals(&patterns), vec![(PatternKind::CleanName, "Glossary")]);
    }
}
