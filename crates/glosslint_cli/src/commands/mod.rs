//! Subcommand implementations

mod init;
mod scan;
mod terms;

pub use init::run_init;
pub use scan::run_scan;
pub use terms::run_terms;

use glosslint_core::ScanConfig;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;

/// Loads the configuration named by `--config`, or the one found in the
/// current directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<ScanConfig> {
    if let Some(ref path) = cli.config {
        return ScanConfig::from_file(path).into_diagnostic();
    }
    find_config()
}

pub fn find_config() -> Result<ScanConfig> {
    if let Some(path) = ScanConfig::discover(".") {
        info!("Using config: {}", path.display());
        return ScanConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(ScanConfig::new())
}
