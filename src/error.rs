//! Error types for query operations
//!
//! Every failure surfaces at the point the offending element is pulled or the
//! offending call is made, never while a chain is being built.

use thiserror::Error;

/// Main error type for qseq operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `first`, `single`, `last` (or `second`) found nothing that qualifies
    #[error("Sequence contains no items")]
    EmptySequence,

    /// `single` found a second qualifying element
    #[error("Sequence contains more than one item")]
    MultipleMatches,

    /// `get(index)` ran past the end of the sequence
    #[error("Index {index} is out of range")]
    IndexOutOfRange { index: usize },

    /// `cast` pulled an element that is not of the requested type
    #[error("Element is not of type {expected}")]
    TypeMismatch { expected: &'static str },

    /// Map lookup on a key that is not present
    #[error("No such item.")]
    KeyNotFound,

    /// Rejected map configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::InvalidConfig(err.to_string())
    }
}

/// Result type for qseq operations
pub type QueryResult<T> = Result<T, QueryError>;
