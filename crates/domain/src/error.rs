//! Domain error type.

use thiserror::Error;

/// Errors raised by domain types themselves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An id string did not parse as a uuid
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
