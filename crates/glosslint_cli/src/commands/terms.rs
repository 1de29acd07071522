//! Terms command implementation

use glosslint_core::TermCatalog;
use miette::Result;

use super::load_config;
use crate::cli::{Cli, TermsFormat};
use crate::output::{output_terms_json, output_terms_text};

pub fn run_terms(cli: &Cli, format: TermsFormat) -> Result<()> {
    let config = load_config(cli)?;
    let catalog = TermCatalog::load(&config.glossary_path(), &config.catalog_options());

    match format {
        TermsFormat::Json => output_terms_json(&catalog)?,
        TermsFormat::Text => output_terms_text(&catalog),
    }

    Ok(())
}
