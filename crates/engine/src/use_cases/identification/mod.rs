//! Identification use cases.
//!
//! Hidden-information workflow for owned items: which items are
//! identifiable, whether they are revealed, and keeping the ability-list
//! chat messages of every participant in step with that state.

use std::sync::Arc;

use veilkeep_shared::{AuthorityRequest, ErrorCode, ResponseResult};

use crate::infrastructure::ports::{AuthorityChannel, ChannelError};

mod authority_ops;
mod chat_sync;
mod error;
mod item_settings;
mod print_abilities;
mod projector;
mod reveal;
mod state_store;

pub use authority_ops::AuthorityOperations;
pub use chat_sync::ChatArtifactSync;
pub use error::IdentificationError;
pub use item_settings::{ItemSettings, SettingsOutcome};
pub use print_abilities::PrintAbilities;
pub use projector::AbilityProjector;
pub use reveal::{RevealCoordinator, RevealOutcome, RevealRequest};
pub use state_store::StateStore;

/// Container for identification use cases.
pub struct IdentificationUseCases {
    pub state: Arc<StateStore>,
    pub projector: Arc<AbilityProjector>,
    pub chat: Arc<ChatArtifactSync>,
    pub reveal: Arc<RevealCoordinator>,
    pub print: Arc<PrintAbilities>,
    pub settings: Arc<ItemSettings>,
}

/// How an authority round trip ended, from the requester's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Settled {
    Applied,
    /// The authority could not resolve an id named in the request
    NotFound(String),
    /// Nothing known to have changed canonically
    Failed(String),
}

pub(crate) async fn settle(channel: &dyn AuthorityChannel, request: AuthorityRequest) -> Settled {
    let operation = request.operation();
    match channel.invoke_as_authority(request).await {
        Ok(ResponseResult::Success { .. }) => Settled::Applied,
        Ok(ResponseResult::Error {
            code: ErrorCode::NotFound,
            message,
        }) => Settled::NotFound(message),
        Ok(ResponseResult::Error { code, message }) => {
            tracing::warn!(operation, code = %code, message = %message, "Authority rejected request");
            Settled::Failed(format!("{}: {}", code, message))
        }
        Ok(ResponseResult::Unknown) => {
            tracing::warn!(operation, "Authority answered with an unrecognised response");
            Settled::Failed("unrecognised response".to_string())
        }
        Err(ChannelError::Rejected { code, message }) => {
            tracing::warn!(operation, code = %code, message = %message, "Authority refused request");
            Settled::Failed(format!("{}: {}", code, message))
        }
        Err(e) => {
            if e.outcome_unknown() {
                tracing::warn!(operation, error = %e, "Authority outcome unknown; state will resync on next read");
            } else {
                tracing::warn!(operation, error = %e, "Authority unreachable");
            }
            Settled::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockAuthorityChannel;
    use uuid::Uuid;

    fn request() -> AuthorityRequest {
        AuthorityRequest::SetRevealed {
            actor_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            revealed: Some(true),
        }
    }

    fn channel_returning(
        result: Result<ResponseResult, ChannelError>,
    ) -> MockAuthorityChannel {
        let mut channel = MockAuthorityChannel::new();
        channel
            .expect_invoke_as_authority()
            .times(1)
            .returning(move |_| result.clone());
        channel
    }

    #[tokio::test]
    async fn refused_operation_settles_as_failed() {
        let channel = channel_returning(Err(ChannelError::Rejected {
            code: ErrorCode::UnknownOperation,
            message: "No handler registered for setRevealed".into(),
        }));
        let settled = settle(&channel, request()).await;
        assert!(matches!(settled, Settled::Failed(reason) if reason.starts_with("unknown_operation")));
    }

    #[tokio::test]
    async fn not_found_answer_is_kept_apart() {
        let channel = channel_returning(Ok(ResponseResult::error(ErrorCode::NotFound, "Item")));
        assert_eq!(settle(&channel, request()).await, Settled::NotFound("Item".into()));
    }
}
