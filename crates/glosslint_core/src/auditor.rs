//! Audit orchestration.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog::TermCatalog;
use crate::file_finder::FileFinder;
use crate::report::Report;
use crate::scanner::{DocumentScanner, ScanResult};
use crate::{GlossError, ScanConfig};

/// Documents that could not be scanned, with the reason.
pub type ScanFailures = Vec<(PathBuf, GlossError)>;

/// Everything a single audit run produced.
#[derive(Debug, Default)]
pub struct AuditOutcome {
    /// Successfully scanned documents in traversal order.
    pub results: Vec<(PathBuf, ScanResult)>,
    /// Documents skipped because they could not be read.
    pub failures: ScanFailures,
}

impl AuditOutcome {
    /// Total linking opportunities across all documents.
    pub fn total_opportunities(&self) -> usize {
        self.results.iter().map(|(_, r)| r.total()).sum()
    }

    /// Number of documents with at least one opportunity.
    pub fn files_with_opportunities(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| r.has_opportunities())
            .count()
    }
}

/// Runs the term catalog against a documentation tree.
///
/// Loads the catalog once in [`new`](Self::new); every later scan only reads it.
pub struct Auditor {
    config: ScanConfig,
    docs_root: PathBuf,
    report_path: PathBuf,
    catalog: TermCatalog,
    finder: FileFinder,
}

impl Auditor {
    /// Creates an auditor and loads the term catalog.
    ///
    /// Fails only on invalid configuration; a missing glossary directory
    /// leaves the catalog empty.
    pub fn new(config: ScanConfig) -> Result<Self, GlossError> {
        let docs_root = canonicalize_or_keep(config.docs_root_path());
        if !docs_root.is_dir() {
            warn!("Docs root not found: {}", docs_root.display());
        }

        let glossary_dir = canonicalize_or_keep(docs_root.join(&config.glossary_dir));
        let catalog = TermCatalog::load(&glossary_dir, &config.catalog_options());

        // The report may live inside the docs tree; it must never be rescanned.
        let report_path = resolve_file(docs_root.join(&config.output));

        let finder = FileFinder::new(&config.include, &config.exclude)?
            .skip_segments(&config.skip_segments)
            .skip_dir(glossary_dir)
            .skip_file(report_path.clone());

        Ok(Self {
            config,
            docs_root,
            report_path,
            catalog,
            finder,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TermCatalog {
        &self.catalog
    }

    /// Resolved documentation root.
    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    /// Resolved path of the report file.
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Lists the documents that [`run`](Self::run) would scan.
    pub fn discover(&self) -> Vec<PathBuf> {
        self.finder.discover_files(&self.docs_root)
    }

    /// Discovers and scans every document under the docs root.
    pub fn run(&self) -> Result<AuditOutcome, GlossError> {
        let files = self.discover();
        self.scan_files(&files)
    }

    /// Scans the given documents one at a time, in order.
    ///
    /// Unreadable documents are collected in [`AuditOutcome::failures`]
    /// instead of aborting the run.
    pub fn scan_files(&self, files: &[PathBuf]) -> Result<AuditOutcome, GlossError> {
        let scanner = DocumentScanner::new(&self.catalog, &self.config.link_prefix)?;
        let mut outcome = AuditOutcome::default();

        for path in files {
            match scanner.scan_file(path) {
                Ok(result) => outcome.results.push((path.clone(), result)),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    outcome.failures.push((path.clone(), e));
                }
            }
        }

        info!(
            "Scanned {} files, found {} linking opportunities",
            outcome.results.len(),
            outcome.total_opportunities()
        );
        Ok(outcome)
    }

    /// Builds the report for an outcome of this auditor.
    pub fn report(&self, outcome: &AuditOutcome) -> Report {
        Report::build(
            &outcome.results,
            &self.catalog,
            &self.docs_root,
            &self.config.link_prefix,
        )
    }
}

fn canonicalize_or_keep(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}

/// Canonicalizes a file that may not exist yet through its parent directory.
fn resolve_file(path: PathBuf) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => canonicalize_or_keep(parent.to_path_buf()).join(name),
        _ => path,
    }
}
