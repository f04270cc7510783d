//! Identification workflow errors.

use crate::infrastructure::ports::{ArtifactError, RenderError, RepoError};
use veilkeep_domain::DomainError;

/// Errors from the identification use cases.
///
/// `EntityNotFound` is a caller bug or stale reference and is always
/// propagated. Channel failures inside the reveal flow are downgraded to a
/// failed outcome before they reach this type.
#[derive(Debug, thiserror::Error)]
pub enum IdentificationError {
    #[error("{entity_type} not found: {id}")]
    EntityNotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("Repository error: {0}")]
    Repo(RepoError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl IdentificationError {
    pub fn entity_not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::EntityNotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }
}

impl From<RepoError> for IdentificationError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => Self::EntityNotFound { entity_type, id },
            other => Self::Repo(other),
        }
    }
}
