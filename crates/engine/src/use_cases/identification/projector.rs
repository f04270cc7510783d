//! Projection of an actor's inventory into the revealable ability list.

use std::sync::Arc;

use veilkeep_domain::common::compare_display_names;
use veilkeep_domain::{ActorId, IdentifiableAbility};

use super::{IdentificationError, StateStore};
use crate::infrastructure::ports::ActorRepo;

pub struct AbilityProjector {
    actors: Arc<dyn ActorRepo>,
    state: Arc<StateStore>,
}

impl AbilityProjector {
    pub fn new(actors: Arc<dyn ActorRepo>, state: Arc<StateStore>) -> Self {
        Self { actors, state }
    }

    /// Identifiable items of `actor_id`, sorted by name.
    ///
    /// Always read fresh from the store; nothing is cached between calls.
    pub async fn project(
        &self,
        actor_id: ActorId,
    ) -> Result<Vec<IdentifiableAbility>, IdentificationError> {
        let actor = self
            .actors
            .get_actor(actor_id)
            .await?
            .ok_or_else(|| IdentificationError::entity_not_found("Actor", actor_id))?;

        let mut retained: Vec<_> = actor
            .items
            .iter()
            .map(|item| (item, self.state.get_setting(item)))
            .filter(|(_, setting)| setting.is_identifiable)
            .collect();
        retained.sort_by(|(a, _), (b, _)| compare_display_names(&a.name, &b.name));

        let abilities: Vec<_> = retained
            .into_iter()
            .map(|(item, setting)| IdentifiableAbility::from_item(actor_id, item, &setting))
            .collect();

        tracing::debug!(
            actor_id = %actor_id,
            items = actor.items.len(),
            identifiable = abilities.len(),
            "Projected abilities"
        );
        Ok(abilities)
    }
}
