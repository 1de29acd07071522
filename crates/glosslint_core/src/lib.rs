//! # glosslint_core
//!
//! Glossary term matching engine for glosslint.
//!
//! This crate provides:
//! - Term catalog loading and search pattern generation
//! - Code block and existing link detection
//! - Per-document scanning for unlinked term mentions
//! - Report aggregation and rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use glosslint_core::{Auditor, ScanConfig};
//!
//! let config = ScanConfig::from_file(".glosslint.jsonc")?;
//! let auditor = Auditor::new(config)?;
//!
//! let outcome = auditor.run()?;
//! let report = auditor.report(&outcome);
//! println!("{}", report.to_markdown(&auditor.config().render_options()));
//! ```

mod auditor;
pub mod catalog;
mod config;
mod error;
pub mod file_finder;
pub mod pattern;
pub mod position;
pub mod report;
pub mod scanner;

pub use auditor::{AuditOutcome, Auditor, ScanFailures};
pub use catalog::{CatalogOptions, CatalogWarning, Term, TermCatalog};
pub use config::ScanConfig;
pub use error::GlossError;
pub use pattern::{Pattern, PatternKind, generate_patterns};
pub use position::{PositionIndex, is_inside_code_block, is_inside_existing_link};
pub use report::{RenderOptions, Report, ReportFormat, ReportSummary, write_report};
pub use scanner::{DocumentScanner, Occurrence, ScanResult};
