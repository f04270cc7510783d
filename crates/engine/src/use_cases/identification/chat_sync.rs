//! Keeping ability-list chat messages aligned with the projection.
//!
//! Two write paths exist:
//! - `apply_local`: this participant's view only, used for optimistic and
//!   first renders
//! - `apply_canonical`: the durable message every participant converges on

use std::sync::Arc;

use veilkeep_domain::{AbilityOverrides, ActorId, IdentifiableAbility, MessageId, Speaker};

use super::{AbilityProjector, IdentificationError};
use crate::infrastructure::ports::{
    ArtifactStore, ChatView, TemplateContext, TemplateRef, TemplateRenderer,
};

pub struct ChatArtifactSync {
    projector: Arc<AbilityProjector>,
    renderer: Arc<dyn TemplateRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
    view: Arc<dyn ChatView>,
}

impl ChatArtifactSync {
    pub fn new(
        projector: Arc<AbilityProjector>,
        renderer: Arc<dyn TemplateRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        view: Arc<dyn ChatView>,
    ) -> Self {
        Self {
            projector,
            renderer,
            artifacts,
            view,
        }
    }

    /// Markup for an actor's ability list.
    ///
    /// A precomputed list in `overrides` is rendered as-is, which lets the
    /// caller show state that has not been persisted yet.
    pub async fn render(
        &self,
        actor_id: ActorId,
        overrides: &AbilityOverrides,
    ) -> Result<String, IdentificationError> {
        let items = match &overrides.abilities {
            Some(abilities) => abilities.clone(),
            None => self.projector.project(actor_id).await?,
        };
        self.render_abilities(items).await
    }

    pub async fn render_abilities(
        &self,
        items: Vec<IdentifiableAbility>,
    ) -> Result<String, IdentificationError> {
        let markup = self
            .renderer
            .render(TemplateRef::AbilityList, TemplateContext::AbilityList { items })
            .await?;
        Ok(markup)
    }

    pub fn apply_local(&self, message_id: MessageId, markup: &str) {
        self.view.apply_local(message_id, markup);
    }

    pub async fn apply_canonical(
        &self,
        message_id: MessageId,
        markup: String,
    ) -> Result<(), IdentificationError> {
        self.artifacts.update(message_id, markup).await?;
        tracing::info!(message_id = %message_id, "Canonical chat message updated");
        Ok(())
    }

    /// Render and apply to this participant's view only.
    pub async fn refresh_local(
        &self,
        message_id: MessageId,
        actor_id: ActorId,
        overrides: &AbilityOverrides,
    ) -> Result<(), IdentificationError> {
        let markup = self.render(actor_id, overrides).await?;
        self.apply_local(message_id, &markup);
        Ok(())
    }

    /// Render and persist for every participant.
    pub async fn refresh_canonical(
        &self,
        message_id: MessageId,
        actor_id: ActorId,
        overrides: &AbilityOverrides,
    ) -> Result<(), IdentificationError> {
        let markup = self.render(actor_id, overrides).await?;
        self.apply_canonical(message_id, markup).await
    }

    /// Create a new chat message.
    pub async fn post(
        &self,
        speaker: Speaker,
        markup: String,
    ) -> Result<MessageId, IdentificationError> {
        let message_id = self.artifacts.create(markup, speaker).await?;
        Ok(message_id)
    }
}
