//! Output formatting module

mod terms;

pub use terms::{output_terms_json, output_terms_text};

use std::path::{Path, PathBuf};

use glosslint_core::{GlossError, RenderOptions, Report, ReportFormat, write_report};
use miette::{IntoDiagnostic, Result};

/// Renders the report and writes it, replacing any previous report.
pub fn write_report_file(
    report: &Report,
    format: ReportFormat,
    options: &RenderOptions,
    path: &Path,
) -> Result<()> {
    let rendered = report.render(format, options).into_diagnostic()?;
    write_report(path, &rendered).into_diagnostic()
}

pub fn output_summary(report: &Report, report_path: &Path) {
    let summary = &report.summary;

    println!(
        "Scanned {} files, found {} linking opportunities in {} files ({} terms already linked)",
        summary.files_scanned,
        summary.total_opportunities,
        summary.files_with_opportunities,
        summary.already_linked
    );

    for file in report.files.iter().take(10) {
        println!("  {}: {} opportunities", file.path, file.opportunities);
    }
    if report.files.len() > 10 {
        println!("  ... and {} more files", report.files.len() - 10);
    }

    println!("Report: {}", report_path.display());
}

pub fn output_failures(failures: &[(PathBuf, GlossError)]) {
    if failures.is_empty() {
        return;
    }

    eprintln!("\n{} file(s) could not be scanned:", failures.len());
    for (path, error) in failures {
        eprintln!("  {}: {}", path.display(), error);
    }
}
