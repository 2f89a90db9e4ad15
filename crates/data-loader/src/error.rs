//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - Error messages with context
//! - Automatic `Display` and `Error` trait implementations

use thiserror::Error;

/// Errors that can occur while reading rating records or building a `RatingStore`
///
/// `ParseError` and `FieldCountMismatch` together are the "data format" errors:
/// a record that does not map to four integer fields. Any of them aborts
/// construction, so a half-built store never reaches the caller.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A field in a rating line couldn't be parsed as an integer
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },
}

impl DataLoadError {
    /// True for the errors caused by a malformed record, as opposed to I/O failures
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            DataLoadError::ParseError { .. } | DataLoadError::FieldCountMismatch { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
