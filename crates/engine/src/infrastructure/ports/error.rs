//! Error types for port operations.

use veilkeep_shared::ErrorCode;

/// Repository operation errors with context for debugging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Storage operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Storage error with operation context.
    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    #[error("Template {template} failed to render: {message}")]
    Failed {
        template: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtifactError {
    #[error("Chat artifact not found: {0}")]
    NotFound(String),
}

/// Errors from reaching the authority.
///
/// `Timeout` and `Closed` mean the outcome is unknown: the mutation may or
/// may not have been applied.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    #[error("No authority reachable: {0}")]
    Unavailable(String),
    #[error("Authority did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("Channel closed before the authority answered")]
    Closed,
    #[error("Authority rejected the request ({code}): {message}")]
    Rejected { code: ErrorCode, message: String },
}

impl ChannelError {
    /// True when the authority may still have applied the request.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Closed)
    }
}

/// Errors from session membership operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("An authority is already connected to this session")]
    AuthorityAlreadyConnected,
    #[error("Participant not found: {0}")]
    NotFound(String),
}
