//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use glosslint_core::ReportFormat;

/// glosslint - Find glossary terms that are mentioned but not linked
#[derive(Parser)]
#[command(name = "glosslint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan documentation and write the linking report
    Scan(ScanArgs),

    /// List glossary terms and their search patterns
    Terms {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = TermsFormat::Text)]
        format: TermsFormat,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// Root of the documentation tree (overrides config)
    #[arg(long)]
    pub docs_root: Option<PathBuf>,

    /// Directory of term definition files (overrides config)
    #[arg(long)]
    pub glossary_dir: Option<PathBuf>,

    /// Report file to write (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Exit with status 1 when any linking opportunity is found
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TermsFormat {
    Text,
    Json,
}
