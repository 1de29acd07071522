//! Report aggregation and rendering.
//!
//! Pure formatting: every filtering decision was already made by the scanner.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::GlossError;
use crate::catalog::TermCatalog;
use crate::scanner::{Occurrence, ScanResult};

/// Examples listed per term before the remainder is summarised.
pub const DEFAULT_MAX_EXAMPLES: usize = 5;

/// Characters of line text shown per example.
pub const DEFAULT_EXCERPT_WIDTH: usize = 100;

/// Output format of the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Knobs for the Markdown rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_examples: usize,
    pub excerpt_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_examples: DEFAULT_MAX_EXAMPLES,
            excerpt_width: DEFAULT_EXCERPT_WIDTH,
        }
    }
}

/// Aggregate counts over the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub files_scanned: usize,
    pub total_opportunities: usize,
    pub files_with_opportunities: usize,
    pub already_linked: usize,
}

/// Opportunities for one term within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermReport {
    pub id: String,
    pub display_name: String,
    pub link: String,
    pub occurrences: Vec<Occurrence>,
}

/// Section for one document with at least one opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the docs root.
    pub path: String,
    pub opportunities: usize,
    pub already_linked: Vec<String>,
    pub terms: Vec<TermReport>,
}

/// The linking opportunities report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub docs_root: String,
    pub summary: ReportSummary,
    /// Documents ordered by descending opportunity count.
    pub files: Vec<FileReport>,
}

impl Report {
    /// Aggregates per-document results, given in traversal order.
    pub fn build(
        results: &[(PathBuf, ScanResult)],
        catalog: &TermCatalog,
        docs_root: &Path,
        link_prefix: &str,
    ) -> Self {
        let mut summary = ReportSummary {
            files_scanned: results.len(),
            ..ReportSummary::default()
        };
        let mut files = Vec::new();

        for (path, result) in results {
            summary.already_linked += result.already_linked.len();

            let opportunities = result.total();
            if opportunities == 0 {
                continue;
            }
            summary.total_opportunities += opportunities;
            summary.files_with_opportunities += 1;

            let terms = result
                .occurrences
                .iter()
                .filter(|(_, occs)| !occs.is_empty())
                .map(|(id, occs)| TermReport {
                    id: id.clone(),
                    display_name: catalog
                        .get(id)
                        .map_or_else(|| id.clone(), |t| t.display_name.clone()),
                    link: format!("{}{}", link_prefix, id),
                    occurrences: occs.clone(),
                })
                .collect();

            files.push(FileReport {
                path: relative_display(path, docs_root),
                opportunities,
                already_linked: result.already_linked.iter().cloned().collect(),
                terms,
            });
        }

        // Stable: equal counts keep traversal order.
        files.sort_by(|a, b| b.opportunities.cmp(&a.opportunities));

        Self {
            docs_root: docs_root.display().to_string(),
            summary,
            files,
        }
    }

    /// Renders the report in the requested format.
    pub fn render(
        &self,
        format: ReportFormat,
        options: &RenderOptions,
    ) -> Result<String, GlossError> {
        match format {
            ReportFormat::Markdown => Ok(self.to_markdown(options)),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Renders the human-readable Markdown report.
    pub fn to_markdown(&self, options: &RenderOptions) -> String {
        let summary = &self.summary;
        let mut lines = vec![
            "# Glossary Linking Opportunities Report".to_string(),
            String::new(),
            format!("**Generated:** {}", self.docs_root),
            format!("**Total Files Scanned:** {}", summary.files_scanned),
            String::new(),
            "## Summary".to_string(),
            String::new(),
            format!(
                "- **Total Linking Opportunities:** {}",
                summary.total_opportunities
            ),
            format!(
                "- **Files with Opportunities:** {}",
                summary.files_with_opportunities
            ),
            format!("- **Already Linked Terms:** {}", summary.already_linked),
            String::new(),
            "---".to_string(),
            String::new(),
            "## By File".to_string(),
            String::new(),
        ];

        for file in &self.files {
            lines.push(format!(
                "### `{}` ({} opportunities)",
                file.path, file.opportunities
            ));
            lines.push(String::new());

            if !file.already_linked.is_empty() {
                let linked = file
                    .already_linked
                    .iter()
                    .map(|id| format!("`{}`", id))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("**Already linked:** {}", linked));
                lines.push(String::new());
            }

            for term in &file.terms {
                lines.push(format!("#### {} (→ `{}`)", term.display_name, term.link));
                lines.push(String::new());

                for occ in term.occurrences.iter().take(options.max_examples) {
                    lines.push(format!(
                        "- **Line {}:** `{}`",
                        occ.line,
                        excerpt(&occ.text, options.excerpt_width)
                    ));
                }

                let remaining = term.occurrences.len().saturating_sub(options.max_examples);
                if remaining > 0 {
                    lines.push(format!("- *...and {} more occurrences*", remaining));
                }

                lines.push(String::new());
            }

            lines.push("---".to_string());
            lines.push(String::new());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Serializes the full report, including every occurrence, as JSON.
    pub fn to_json(&self) -> Result<String, GlossError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the rendered report, creating missing parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), GlossError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            GlossError::file(format!(
                "Failed to create report directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    fs::write(path, contents).map_err(|e| {
        GlossError::file(format!("Failed to write report {}: {}", path.display(), e))
    })?;

    info!("Report saved to {}", path.display());
    Ok(())
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn excerpt(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Term;
    use crate::scanner::{DEFAULT_LINK_PREFIX, DocumentScanner};
    use pretty_assertions::assert_eq;

    fn catalog() -> TermCatalog {
        let reserved = Vec::new();
        TermCatalog::from_terms(vec![
            Term::new("tdd", "TDD (Test-Driven Development)", "tdd.md", &reserved).unwrap(),
            Term::new("react", "React", "react.md", &reserved).unwrap(),
        ])
    }

    fn scan_all(docs: &[(&str, &str)], catalog: &TermCatalog) -> Vec<(PathBuf, ScanResult)> {
        let scanner = DocumentScanner::new(catalog, DEFAULT_LINK_PREFIX).unwrap();
        docs.iter()
            .map(|(name, content)| (Path::new("/docs").join(name), scanner.scan_text(content)))
            .collect()
    }

    #[test]
    fn test_summary_counts() {
        let catalog = catalog();
        let results = scan_all(
            &[
                ("a.md", "TDD here. React there."),
                ("b.md", "Nothing to see."),
                ("c.md", "[TDD](/docs/glossary/terms/tdd) then React."),
            ],
            &catalog,
        );

        let report = Report::build(&results, &catalog, Path::new("/docs"), DEFAULT_LINK_PREFIX);

        assert_eq!(
            report.summary,
            ReportSummary {
                files_scanned: 3,
                total_opportunities: 3,
                files_with_opportunities: 2,
                already_linked: 1,
            }
        );
        assert!(report.files.iter().all(|f| f.path != "b.md"));
    }

    #[test]
    fn test_files_ordered_by_descending_count_with_stable_ties() {
        let catalog = catalog();
        let results = scan_all(
            &[
                ("one.md", "React."),
                ("three.md", "React. TDD. React again."),
                ("also-one.md", "TDD."),
            ],
            &catalog,
        );

        let report = Report::build(&results, &catalog, Path::new("/docs"), DEFAULT_LINK_PREFIX);
        let order: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(order, vec!["three.md", "one.md", "also-one.md"]);
    }

    #[test]
    fn test_markdown_sections() {
        let catalog = catalog();
        let results = scan_all(
            &[("guide.md", "[React](/docs/glossary/terms/react)\nWe use TDD.")],
            &catalog,
        );

        let report = Report::build(&results, &catalog, Path::new("/docs"), DEFAULT_LINK_PREFIX);
        let markdown = report.to_markdown(&RenderOptions::default());

        let expected = "\
# Glossary Linking Opportunities Report

**Generated:** /docs
**Total Files Scanned:** 1

## Summary

- **Total Linking Opportunities:** 1
- **Files with Opportunities:** 1
- **Already Linked Terms:** 1

---

## By File

### `guide.md` (1 opportunities)

**Already linked:** `react`

#### TDD (Test-Driven Development) (→ `/docs/glossary/terms/tdd`)

- **Line 2:** `We use TDD.`

---

";
        assert_eq!(markdown, expected);
    }

    #[test]
    fn test_markdown_limits_examples() {
        let catalog = catalog();
        let content = (1..=7).map(|i| format!("React {}", i)).collect::<Vec<_>>().join("\n");
        let results = scan_all(&[("many.md", content.as_str())], &catalog);

        let report = Report::build(&results, &catalog, Path::new("/docs"), DEFAULT_LINK_PREFIX);
        let markdown = report.to_markdown(&RenderOptions::default());

        assert!(markdown.contains("- **Line 5:** `React 5`"));
        assert!(!markdown.contains("- **Line 6:**"));
        assert!(markdown.contains("- *...and 2 more occurrences*"));
    }

    #[test]
    fn test_excerpt_truncates_long_lines() {
        let long = "x".repeat(120);

        assert_eq!(excerpt(&long, 100), format!("{}...", "x".repeat(100)));
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn test_json_contains_all_occurrences() {
        let catalog = catalog();
        let results = scan_all(&[("a.md", "React and TDD")], &catalog);

        let report = Report::build(&results, &catalog, Path::new("/docs"), DEFAULT_LINK_PREFIX);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["summary"]["total_opportunities"], 2);
        assert_eq!(json["files"][0]["path"], "a.md");
        assert_eq!(json["files"][0]["terms"][0]["id"], "react");
        assert_eq!(json["files"][0]["terms"][1]["occurrences"][0]["matched"], "TDD");
    }

    #[test]
    fn test_write_report_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("scripts/nested/report.md");

        write_report(&path, "# Report\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report\n");
    }

    #[test]
    fn test_write_report_fails_when_parent_is_a_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_report(&blocker.join("report.md"), "# Report\n").unwrap_err();

        assert!(matches!(
            err,
            GlossError::File(ref message) if message.contains("Failed to create report directory")
        ));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[test]
    fn test_write_report_fails_when_target_is_a_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("report.md");
        fs::create_dir(&target).unwrap();

        let result = write_report(&target, "# Report\n");

        assert!(matches!(result, Err(GlossError::File(_))));
    }
}
