//! Posting an actor's ability list to chat.

use std::sync::Arc;

use veilkeep_domain::{ActorId, IdentifiableAbility, MessageId};

use super::{AbilityProjector, ChatArtifactSync, IdentificationError};
use crate::infrastructure::ports::{ActorRepo, AuthorityChannel};

pub struct PrintAbilities {
    actors: Arc<dyn ActorRepo>,
    projector: Arc<AbilityProjector>,
    chat: Arc<ChatArtifactSync>,
    channel: Arc<dyn AuthorityChannel>,
}

impl PrintAbilities {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        projector: Arc<AbilityProjector>,
        chat: Arc<ChatArtifactSync>,
        channel: Arc<dyn AuthorityChannel>,
    ) -> Self {
        Self {
            actors,
            projector,
            chat,
            channel,
        }
    }

    /// Create the chat message, then give this participant a fast local
    /// render. The authority's local copy keeps revealed entries enabled so
    /// they can be un-revealed.
    pub async fn execute(&self, actor_id: ActorId) -> Result<MessageId, IdentificationError> {
        let actor = self
            .actors
            .get_actor(actor_id)
            .await?
            .ok_or_else(|| IdentificationError::entity_not_found("Actor", actor_id))?;

        let abilities = self.projector.project(actor_id).await?;
        let markup = self.chat.render_abilities(abilities.clone()).await?;
        let message_id = self.chat.post(actor.speaker(), markup).await?;

        let local: Vec<IdentifiableAbility> = if self.channel.is_authority() {
            abilities
                .into_iter()
                .map(IdentifiableAbility::unlocked)
                .collect()
        } else {
            abilities
        };
        let local_markup = self.chat.render_abilities(local).await?;
        self.chat.apply_local(message_id, &local_markup);

        tracing::info!(actor_id = %actor_id, message_id = %message_id, "Printed abilities");
        Ok(message_id)
    }
}
