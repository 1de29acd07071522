//! Glossary term catalog.
//!
//! Each term lives in its own Markdown file; the file stem is the term
//! identifier and the first `# Heading` is its display name.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::GlossError;
use crate::pattern::{DEFAULT_RESERVED_IDS, Pattern, generate_patterns};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("Invalid heading regex"));

/// Extension of term definition files.
pub const TERM_FILE_EXTENSION: &str = "md";

/// Number of bytes read from a term file when looking for its heading.
pub const DEFAULT_HEADING_SCAN_BYTES: usize = 500;

/// A glossary entry and the patterns that detect it in prose.
#[derive(Debug, Clone)]
pub struct Term {
    /// Unique identifier, taken from the definition file stem.
    pub id: String,
    /// Human-readable name, taken from the first heading.
    pub display_name: String,
    /// Patterns derived from the display name and identifier.
    pub patterns: Vec<Pattern>,
    /// Definition file the term was loaded from.
    pub source: PathBuf,
}

impl Term {
    /// Builds a term and derives its patterns.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        source: impl Into<PathBuf>,
        reserved_ids: &[String],
    ) -> Result<Self, GlossError> {
        let id = id.into();
        let display_name = display_name.into();
        let patterns = generate_patterns(&display_name, &id, reserved_ids)?;

        Ok(Self {
            id,
            display_name,
            patterns,
            source: source.into(),
        })
    }
}

/// Options controlling how term files are read.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Identifiers that never get an identifier pattern.
    pub reserved_ids: Vec<String>,
    /// Size of the file prefix searched for the heading.
    pub heading_scan_bytes: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            reserved_ids: DEFAULT_RESERVED_IDS.iter().map(|s| s.to_string()).collect(),
            heading_scan_bytes: DEFAULT_HEADING_SCAN_BYTES,
        }
    }
}

/// A non-fatal problem found while loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The glossary directory does not exist.
    MissingDirectory(PathBuf),
    /// A term file has no `# Heading` within the scanned prefix.
    NoHeading(PathBuf),
    /// A term file could not be read.
    Unreadable { path: PathBuf, reason: String },
    /// A term produced a pattern that could not be compiled.
    InvalidPattern { path: PathBuf, reason: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDirectory(path) => {
                write!(f, "Glossary directory not found: {}", path.display())
            }
            Self::NoHeading(path) => write!(f, "No heading found in {}", path.display()),
            Self::Unreadable { path, reason } => {
                write!(f, "Failed to read {}: {}", path.display(), reason)
            }
            Self::InvalidPattern { path, reason } => {
                write!(f, "Invalid pattern for {}: {}", path.display(), reason)
            }
        }
    }
}

/// The set of known terms, keyed and ordered by identifier.
///
/// Built once, then shared read-only by every document scan.
#[derive(Debug, Clone, Default)]
pub struct TermCatalog {
    terms: BTreeMap<String, Term>,
    warnings: Vec<CatalogWarning>,
}

impl TermCatalog {
    /// Creates a catalog from already constructed terms.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| (t.id.clone(), t)).collect(),
            warnings: Vec::new(),
        }
    }

    /// Loads every `*.md` file directly inside `dir`.
    ///
    /// Never fails: a missing directory yields an empty catalog and files
    /// without a heading are skipped. Both are recorded in [`warnings`](Self::warnings).
    pub fn load(dir: &Path, options: &CatalogOptions) -> Self {
        let mut catalog = Self::default();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    catalog.warn(CatalogWarning::MissingDirectory(dir.to_path_buf()));
                } else {
                    catalog.warn(CatalogWarning::Unreadable {
                        path: dir.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                return catalog;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == TERM_FILE_EXTENSION)
            })
            .collect();
        files.sort();

        for path in files {
            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            let prefix = match read_prefix(&path, options.heading_scan_bytes) {
                Ok(prefix) => prefix,
                Err(e) => {
                    catalog.warn(CatalogWarning::Unreadable {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(display_name) = extract_display_name(&prefix) else {
                catalog.warn(CatalogWarning::NoHeading(path));
                continue;
            };

            match Term::new(id, display_name, &path, &options.reserved_ids) {
                Ok(term) => {
                    debug!(
                        "Loaded term '{}' ({}) with {} patterns",
                        term.id,
                        term.display_name,
                        term.patterns.len()
                    );
                    catalog.terms.insert(term.id.clone(), term);
                }
                Err(e) => catalog.warn(CatalogWarning::InvalidPattern {
                    path,
                    reason: e.to_string(),
                }),
            }
        }

        info!("Loaded {} glossary terms from {}", catalog.len(), dir.display());
        catalog
    }

    fn warn(&mut self, warning: CatalogWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Returns the term with the given identifier.
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Iterates over terms in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Problems encountered while loading.
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Returns whether the glossary directory was missing.
    pub fn is_missing_directory(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, CatalogWarning::MissingDirectory(_)))
    }
}

/// Returns the text of the first `# Heading` line, trimmed.
pub fn extract_display_name(content: &str) -> Option<String> {
    HEADING_RE
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

fn read_prefix(path: &Path, limit: usize) -> std::io::Result<String> {
    let mut buf = Vec::with_capacity(limit);
    File::open(path)?.take(limit as u64).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
