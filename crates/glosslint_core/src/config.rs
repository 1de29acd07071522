//! Scan configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::GlossError;
use crate::catalog::{CatalogOptions, DEFAULT_HEADING_SCAN_BYTES};
use crate::pattern::DEFAULT_RESERVED_IDS;
use crate::report::{DEFAULT_EXCERPT_WIDTH, DEFAULT_MAX_EXAMPLES, RenderOptions, ReportFormat};
use crate::scanner::DEFAULT_LINK_PREFIX;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for a glossary scan.
///
/// Relative `docs_root` is resolved against [`base_dir`](Self::base_dir);
/// `glossary_dir` and `output` are resolved against the docs root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root of the documentation tree.
    pub docs_root: String,

    /// Directory of term definition files.
    pub glossary_dir: String,

    /// Report file.
    pub output: String,

    /// Report format.
    pub format: ReportFormat,

    /// Link target prefix that marks a term as already linked.
    pub link_prefix: String,

    /// Identifiers too ambiguous to match on their own.
    pub reserved_ids: Vec<String>,

    /// Path component names whose subtrees are never scanned.
    pub skip_segments: Vec<String>,

    /// Document patterns to include.
    pub include: Vec<String>,

    /// Document patterns to exclude.
    pub exclude: Vec<String>,

    /// Examples listed per term in the Markdown report.
    pub max_examples: usize,

    /// Characters of line text per example.
    pub excerpt_width: usize,

    /// Bytes of each term file searched for its heading.
    pub heading_scan_bytes: usize,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl ScanConfig {
    /// Configuration file names, in discovery order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".glosslint.jsonc", ".glosslint.json"];

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            docs_root: ".".to_string(),
            glossary_dir: "glossary/terms".to_string(),
            output: "scripts/linking-report.md".to_string(),
            format: ReportFormat::Markdown,
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            reserved_ids: DEFAULT_RESERVED_IDS.iter().map(|s| s.to_string()).collect(),
            skip_segments: vec!["scripts".to_string()],
            include: vec!["**/*.md".to_string()],
            exclude: Vec::new(),
            max_examples: DEFAULT_MAX_EXAMPLES,
            excerpt_width: DEFAULT_EXCERPT_WIDTH,
            heading_scan_bytes: DEFAULT_HEADING_SCAN_BYTES,
            base_dir: None,
        }
    }

    /// Looks for a configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.glosslint.jsonc`, `.glosslint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GlossError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| GlossError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, GlossError> {
        let value: serde_json::Value =
            jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
                .map_err(|e| GlossError::config(format!("Invalid JSON: {}", e)))?
                .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(GlossError::config(format!(
                "Config validation failed: {}",
                e
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| GlossError::config(format!("Invalid config: {}", e)))
    }

    /// Resolved root of the documentation tree.
    pub fn docs_root_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(&self.docs_root),
            None => PathBuf::from(&self.docs_root),
        }
    }

    /// Resolved glossary directory.
    pub fn glossary_path(&self) -> PathBuf {
        self.docs_root_path().join(&self.glossary_dir)
    }

    /// Options for loading the term catalog.
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            reserved_ids: self.reserved_ids.clone(),
            heading_scan_bytes: self.heading_scan_bytes,
        }
    }

    /// Options for rendering the report.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_examples: self.max_examples,
            excerpt_width: self.excerpt_width,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
