//! Error types for value generation setup.

use thiserror::Error;

/// Errors raised while configuring a [`ValueFactory`](crate::ValueFactory).
///
/// Generation itself never fails; every check happens up front.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// A date or time format pool has no entries.
    #[error("{0} format pool is empty")]
    EmptyFormatPool(&'static str),

    /// A strftime pattern contains an unknown or incomplete specifier.
    #[error("Invalid {kind} format pattern '{pattern}'")]
    InvalidFormat { kind: &'static str, pattern: String },

    /// The date window ends before it starts.
    #[error("Date window end {end} is before start {start}")]
    InvalidWindow { start: String, end: String },

    /// A timestamp could not be parsed.
    #[error("Invalid timestamp '{0}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidTimestamp(String),

    /// A custom generator definition is unusable.
    #[error("Invalid generator for '{key}': {reason}")]
    InvalidGenerator { key: String, reason: String },
}
