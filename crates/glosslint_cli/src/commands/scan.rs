//! Scan command implementation

use std::path::Path;

use glosslint_core::{Auditor, ReportFormat, ScanConfig};
use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use super::load_config;
use crate::cli::{Cli, ScanArgs};
use crate::output::{output_failures, output_summary, write_report_file};

pub fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<bool> {
    let mut config = load_config(cli)?;
    apply_overrides(&mut config, args)?;

    let auditor = Auditor::new(config).into_diagnostic()?;
    if auditor.catalog().is_missing_directory() {
        warn!("Glossary directory not found; the report will be empty");
    } else if auditor.catalog().is_empty() {
        warn!("No glossary terms loaded; the report will be empty");
    } else {
        info!("Loaded {} glossary terms", auditor.catalog().len());
    }

    let outcome = auditor.run().into_diagnostic()?;
    output_failures(&outcome.failures);

    let report = auditor.report(&outcome);
    let config = auditor.config();
    let format = args.format.map(ReportFormat::from).unwrap_or(config.format);
    let output_path = auditor.report_path();

    write_report_file(&report, format, &config.render_options(), output_path)?;
    output_summary(&report, output_path);

    Ok(args.check && report.summary.total_opportunities > 0)
}

/// Applies command-line paths on top of the loaded configuration.
///
/// Paths given on the command line are relative to the working directory,
/// not to the configuration file.
fn apply_overrides(config: &mut ScanConfig, args: &ScanArgs) -> Result<()> {
    if let Some(ref docs_root) = args.docs_root {
        config.docs_root = absolute(docs_root)?;
    }
    if let Some(ref glossary_dir) = args.glossary_dir {
        config.glossary_dir = absolute(glossary_dir)?;
    }
    if let Some(ref output) = args.output {
        config.output = absolute(output)?;
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<String> {
    let path = std::path::absolute(path).into_diagnostic()?;
    Ok(path.to_string_lossy().to_string())
}
