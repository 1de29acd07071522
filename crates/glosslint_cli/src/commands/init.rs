//! Init command implementation

use std::path::PathBuf;

use glosslint_core::ScanConfig;
use miette::{IntoDiagnostic, Result};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"{
  // Root of the documentation tree, relative to this file
  "docs_root": ".",
  // Term definition files, relative to docs_root
  "glossary_dir": "glossary/terms",
  "output": "scripts/linking-report.md",
  "format": "markdown",
  "link_prefix": "/docs/glossary/terms/",
  // Identifiers too ambiguous to match as bare words
  "reserved_ids": ["e2e", "api"],
  "skip_segments": ["scripts"],
  "include": ["**/*.md"],
  "exclude": []
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(ScanConfig::CONFIG_FILES[0]);

    // `create_new` refuses any existing entry, including a symlink, so the
    // write never follows one.
    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes()).into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
