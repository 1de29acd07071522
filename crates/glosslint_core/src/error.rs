//! Error types for glossary scanning.

use thiserror::Error;

/// Errors that can occur while auditing documentation.
#[derive(Debug, Error)]
pub enum GlossError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error tied to a specific document or term file.
    #[error("File error: {0}")]
    File(String),

    /// A term produced a pattern that failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Report serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GlossError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }
}
