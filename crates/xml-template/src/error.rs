//! Error types for template loading and serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, querying or serializing a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The template file could not be read.
    #[error("Failed to read template '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML reader rejected the input.
    #[error("Failed to parse XML: {0}")]
    Parse(String),

    /// The input parsed as a token stream but is not a well-formed document.
    #[error("Malformed XML document: {0}")]
    Malformed(String),

    /// The document could not be written back out.
    #[error("Failed to serialize XML: {0}")]
    Serialize(String),
}

/// Error returned when a structural path expression cannot be evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid path expression '{expr}': {reason}")]
pub struct PathError {
    pub expr: String,
    pub reason: String,
}

impl PathError {
    pub(crate) fn new(expr: &str, reason: impl Into<String>) -> Self {
        Self {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}
