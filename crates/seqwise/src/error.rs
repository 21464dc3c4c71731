//! Error types for the seqwise crate.

use thiserror::Error;

/// Errors raised while building or evaluating a query.
///
/// Lazy operators never fail while the chain is being built; their errors
/// surface from the call that drives iteration up to the failing element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required argument was missing, had the wrong shape, or was not
    /// iterable where a sequence was expected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value fell outside the categories an operation supports.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An operation needing at least one element ran on an empty sequence.
    #[error("{op} requires at least one element, but the sequence is empty")]
    EmptySource { op: &'static str },

    /// More than one element qualified where exactly one was required.
    #[error("sequence contains more than one matching element")]
    AmbiguousMatch,

    /// No element qualified.
    #[error("sequence contains no matching element")]
    NotFound,

    /// Positional access outside `[0, len)`.
    #[error("index {index} is out of range")]
    IndexOutOfRange { index: i64 },

    /// A buffering operator was iterated from inside its own key function.
    #[error("sequence was re-entered while it was being materialized")]
    Reentrant,
}

impl QueryError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

/// Result type for seqwise operations.
pub type Result<T> = std::result::Result<T, QueryError>;
