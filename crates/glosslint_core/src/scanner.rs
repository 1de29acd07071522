//! Per-document scanning for unlinked term occurrences.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::GlossError;
use crate::catalog::{Term, TermCatalog};
use crate::position::PositionIndex;

/// Path prefix that marks a link as pointing at a glossary term.
pub const DEFAULT_LINK_PREFIX: &str = "/docs/glossary/terms/";

/// Documents larger than this are not scanned.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// One unlinked mention of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// Identifier of the matched term.
    pub term_id: String,
    /// 1-based line number of the match start.
    pub line: usize,
    /// Byte offset of the match start.
    pub offset: usize,
    /// The exact text that matched.
    pub matched: String,
    /// The surrounding source line, trimmed.
    pub text: String,
}

impl Occurrence {
    fn capture(term_id: &str, index: &PositionIndex<'_>, start: usize, end: usize) -> Self {
        let content = index.text();
        let (line_start, line_end) = index.line_span(start, end);

        Self {
            term_id: term_id.to_string(),
            line: index.line_number(start),
            offset: start,
            matched: content[start..end].to_string(),
            text: content[line_start..line_end].trim().to_string(),
        }
    }
}

/// Scan outcome for a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Unlinked occurrences grouped by term identifier, each group in document order.
    pub occurrences: BTreeMap<String, Vec<Occurrence>>,
    /// Term identifiers that are already linked somewhere in the document.
    pub already_linked: BTreeSet<String>,
}

impl ScanResult {
    /// Total number of linking opportunities in the document.
    pub fn total(&self) -> usize {
        self.occurrences.values().map(Vec::len).sum()
    }

    /// Returns whether at least one opportunity was found.
    pub fn has_opportunities(&self) -> bool {
        self.occurrences.values().any(|occs| !occs.is_empty())
    }

    /// Occurrences recorded for `term_id`, empty if none.
    pub fn occurrences_for(&self, term_id: &str) -> &[Occurrence] {
        self.occurrences
            .get(term_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Finds unlinked term mentions in document text.
///
/// Borrows the catalog read-only, so one catalog serves any number of scans.
pub struct DocumentScanner<'a> {
    catalog: &'a TermCatalog,
    link_re: Regex,
}

impl<'a> DocumentScanner<'a> {
    /// Creates a scanner recognising links of the form `[label](<link_prefix><id>)`.
    pub fn new(catalog: &'a TermCatalog, link_prefix: &str) -> Result<Self, GlossError> {
        let link_re = Regex::new(&format!(
            r"\[([^\]]+)\]\({}([^)]+)\)",
            regex::escape(link_prefix)
        ))?;

        Ok(Self { catalog, link_re })
    }

    /// Collects the term identifiers already used as link targets.
    pub fn linked_ids(&self, content: &str) -> BTreeSet<String> {
        self.link_re
            .captures_iter(content)
            .map(|caps| caps[2].to_string())
            .collect()
    }

    /// Scans document text.
    pub fn scan_text(&self, content: &str) -> ScanResult {
        let already_linked = self.linked_ids(content);
        let index = PositionIndex::new(content);
        let mut occurrences = BTreeMap::new();

        for term in self.catalog.iter() {
            if already_linked.contains(&term.id) {
                continue;
            }

            let found = find_occurrences(term, &index);
            if !found.is_empty() {
                occurrences.insert(term.id.clone(), found);
            }
        }

        ScanResult {
            occurrences,
            already_linked,
        }
    }

    /// Reads and scans a document.
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult, GlossError> {
        debug!("Scanning {}", path.display());

        let metadata = fs::metadata(path).map_err(|e| {
            GlossError::file(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                e
            ))
        })?;

        if !metadata.is_file() {
            return Err(GlossError::file(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        if metadata.len() > MAX_FILE_SIZE {
            return Err(GlossError::file(format!(
                "File size exceeds limit of {} bytes: {}",
                MAX_FILE_SIZE,
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| GlossError::file(format!("Failed to read {}: {}", path.display(), e)))?;

        Ok(self.scan_text(&content))
    }
}

/// Runs every pattern of `term` over the indexed text and keeps the matches
/// that are neither in a code block nor in an existing link.
///
/// Several patterns often hit the same spot (`TDD` as acronym and as
/// identifier); a start offset is recorded once, for the first pattern.
fn find_occurrences(term: &Term, index: &PositionIndex<'_>) -> Vec<Occurrence> {
    let mut by_offset: BTreeMap<usize, Occurrence> = BTreeMap::new();

    for pattern in &term.patterns {
        for m in pattern.find_iter(index.text()) {
            if m.is_empty() || by_offset.contains_key(&m.start()) {
                continue;
            }

            if index.is_inside_code_block(m.start())
                || index.is_inside_existing_link(m.start(), m.end())
            {
                continue;
            }

            by_offset.insert(
                m.start(),
                Occurrence::capture(&term.id, index, m.start(), m.end()),
            );
        }
    }

    by_offset.into_values().collect()
}
