//! Errors raised while parsing survey data

use thiserror::Error;

/// Errors produced by the strict parse steps of the domain layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An example id was not integer-valued text
    #[error("Invalid example id: {0:?}")]
    InvalidExampleId(String),

    /// An assignment's example_ids field could not be parsed
    #[error("Malformed assignment for user '{user_id}': invalid token {token:?}")]
    MalformedAssignment {
        /// User the assignment row belongs to
        user_id: String,
        /// The offending token
        token: String,
    },

    /// A decision outside the enumerated set
    #[error("Invalid decision: {0:?} (expected support, refute or cannot_decide)")]
    InvalidDecision(String),

    /// An example carried more evidence slots than allowed
    #[error("Example {example_id} has {count} evidence slots (maximum {max})")]
    TooManySentences {
        /// Offending example
        example_id: i64,
        /// Number of slots supplied
        count: usize,
        /// Upper bound
        max: usize,
    },
}
