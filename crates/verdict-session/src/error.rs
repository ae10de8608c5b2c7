//! Error types for session operations

use thiserror::Error;
use verdict_domain::{DomainError, ExampleId};

/// Errors that can occur while driving a survey session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No assignment row for the user; the user may retry with another id
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The user's assignment row is corrupt; fatal for the session
    #[error("Malformed assignment for user '{user_id}': invalid token {token:?}")]
    MalformedAssignment {
        /// User whose row failed to parse
        user_id: String,
        /// The offending token
        token: String,
    },

    /// An assigned example is missing from the examples table; fatal for the session
    #[error("Example not found: {0}")]
    ExampleNotFound(ExampleId),

    /// A decision outside support, refute and cannot_decide
    #[error("Invalid decision: {0:?}")]
    InvalidDecision(String),

    /// Flush failed; buffered answers are kept for a retry
    #[error("Failed to save answers: {0}")]
    Persistence(String),

    /// The session is already bound to a different user
    #[error("Session already belongs to '{bound}', cannot switch to '{requested}'")]
    AlreadyBound {
        /// User the session was resolved for
        bound: String,
        /// User that was requested
        requested: String,
    },

    /// Any other data error surfaced by the domain layer
    #[error(transparent)]
    Data(DomainError),
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedAssignment { user_id, token } => {
                SessionError::MalformedAssignment { user_id, token }
            }
            DomainError::InvalidDecision(value) => SessionError::InvalidDecision(value),
            other => SessionError::Data(other),
        }
    }
}

impl SessionError {
    /// Whether the user can recover by acting again (re-entering an id, retrying a flush)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::UserNotFound(_) | SessionError::Persistence(_))
    }
}
