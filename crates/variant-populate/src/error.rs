//! Error types for the variant populator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating variants.
///
/// Duplicate value tuples and selectors that match nothing are not errors;
/// they are absorbed by the generation loop and reported in the run report.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A variant or manifest file could not be written.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template error.
    #[error("Template error: {0}")]
    Template(#[from] xml_template::DocumentError),
}
