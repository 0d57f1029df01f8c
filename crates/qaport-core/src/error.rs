//! Error types for reading JUnit reports.

use std::path::Path;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while loading a JUnit report. All of them are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The report file does not exist.
    #[error("JUnit XML file not found: {path}")]
    NotFound { path: String },

    /// The report exists but could not be read.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The content is not well-formed XML.
    #[error("malformed XML in {source_name}: {message}")]
    Malformed {
        source_name: String,
        message: String,
    },
}

impl ParseError {
    pub(crate) fn not_found(path: &Path) -> Self {
        Self::NotFound {
            path: path.display().to_string(),
        }
    }

    pub(crate) fn malformed(source_name: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Returns true if the input file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
