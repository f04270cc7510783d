//! Handlers the authority runs for the named operations.

use std::sync::Arc;

use async_trait::async_trait;
use veilkeep_domain::{ActorId, ItemId, ItemRef, MessageId};
use veilkeep_shared::{
    AuthorityRequest, ErrorCode, ResponseResult, OP_SET_IDENTIFIABILITY, OP_SET_REVEALED,
    OP_UPDATE_ABILITY_MESSAGE,
};

use super::{ChatArtifactSync, IdentificationError, StateStore};
use crate::infrastructure::ports::{
    ArtifactError, AuthorityChannel, AuthorityHandler, HandlerContext,
};

/// Canonical mutations: reveal, setting write and chat refresh.
pub struct AuthorityOperations {
    state: Arc<StateStore>,
    chat: Arc<ChatArtifactSync>,
}

impl AuthorityOperations {
    pub const OPERATIONS: [&'static str; 3] = [
        OP_SET_REVEALED,
        OP_UPDATE_ABILITY_MESSAGE,
        OP_SET_IDENTIFIABILITY,
    ];

    pub fn new(state: Arc<StateStore>, chat: Arc<ChatArtifactSync>) -> Self {
        Self { state, chat }
    }

    /// Register every operation on `channel`.
    pub fn register_all(self: &Arc<Self>, channel: &dyn AuthorityChannel) {
        for operation in Self::OPERATIONS {
            channel.register(operation, self.clone());
        }
    }

    async fn apply(&self, request: AuthorityRequest) -> Result<ResponseResult, IdentificationError> {
        match request {
            AuthorityRequest::SetRevealed {
                actor_id,
                item_id,
                revealed,
            } => {
                let item = ItemRef::new(ActorId::from_uuid(actor_id), ItemId::from_uuid(item_id));
                let setting = self.state.set_revealed(item, revealed).await?;
                tracing::info!(item = %item, revealed = setting.is_identified, "Reveal stored");
                Ok(ResponseResult::success(setting))
            }
            AuthorityRequest::UpdateAbilityMessage {
                message_id,
                actor_id,
                overrides,
            } => {
                self.chat
                    .refresh_canonical(
                        MessageId::from_uuid(message_id),
                        ActorId::from_uuid(actor_id),
                        &overrides,
                    )
                    .await?;
                Ok(ResponseResult::success_empty())
            }
            AuthorityRequest::SetIdentifiability {
                actor_id,
                item_id,
                setting,
            } => {
                let item = ItemRef::new(ActorId::from_uuid(actor_id), ItemId::from_uuid(item_id));
                let cleared = setting.is_none();
                self.state.set_setting(item, setting).await?;
                tracing::info!(item = %item, cleared, "Identifiability setting stored");
                Ok(ResponseResult::success_empty())
            }
        }
    }
}

#[async_trait]
impl AuthorityHandler for AuthorityOperations {
    async fn handle(&self, request: AuthorityRequest, ctx: HandlerContext) -> ResponseResult {
        let operation = request.operation();
        if !ctx.is_authority {
            tracing::warn!(operation, origin = %ctx.origin, "Refusing operation: not the authority");
            return ResponseResult::error(ErrorCode::Forbidden, "Participant is not the authority");
        }

        match self.apply(request).await {
            Ok(response) => response,
            Err(e) => error_response(operation, e),
        }
    }
}

fn error_response(operation: &'static str, err: IdentificationError) -> ResponseResult {
    match err {
        IdentificationError::EntityNotFound { .. }
        | IdentificationError::Artifact(ArtifactError::NotFound(_)) => {
            tracing::warn!(operation, error = %err, "Operation target not found");
            ResponseResult::error(ErrorCode::NotFound, err.to_string())
        }
        other => {
            tracing::error!(operation, error = %other, "Operation failed");
            ResponseResult::error(ErrorCode::InternalError, other.to_string())
        }
    }
}
