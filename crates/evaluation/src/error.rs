//! Error types for running and summarizing an evaluation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The store was built without a test split
    #[error("No test data: the rating store was built without a test split")]
    NoTestData,

    /// A statistic needs more predictions than the result holds
    #[error("{statistic} needs at least {required} samples but only {found} are available")]
    InsufficientSamples {
        statistic: &'static str,
        required: usize,
        found: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EvaluationError>;
