//! Reveal interaction orchestration.

use std::sync::Arc;

use veilkeep_domain::{
    AbilityOverrides, ActorId, IdentifiableAbility, ItemId, ItemRef, MessageId, RevealPhase,
};
use veilkeep_shared::AuthorityRequest;

use super::{settle, AbilityProjector, ChatArtifactSync, IdentificationError, Settled};
use crate::infrastructure::ports::AuthorityChannel;

/// A validated "reveal this item" request from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealRequest {
    pub actor_id: ActorId,
    pub item_id: ItemId,
    pub message_id: MessageId,
    pub desired_revealed: bool,
}

impl RevealRequest {
    pub fn item(&self) -> ItemRef {
        ItemRef::new(self.actor_id, self.item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The authority stored the reveal. `artifact_refreshed` is false when the
    /// follow-up chat refresh did not go through.
    Confirmed { artifact_refreshed: bool },
    /// Nothing canonical changed; the optimistic render stays in place.
    Failed { reason: String },
}

impl RevealOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// Phase the interaction settled in before returning to idle.
    pub fn phase(&self) -> RevealPhase {
        match self {
            Self::Confirmed { .. } => RevealPhase::Confirmed,
            Self::Failed { .. } => RevealPhase::Failed,
        }
    }
}

/// Drives one reveal: optimistic local render, then the canonical mutation
/// and chat refresh through the authority.
///
/// Requests are not short-circuited when the stored value already matches,
/// so a drifted chat message is always re-rendered.
pub struct RevealCoordinator {
    projector: Arc<AbilityProjector>,
    chat: Arc<ChatArtifactSync>,
    channel: Arc<dyn AuthorityChannel>,
}

impl RevealCoordinator {
    pub fn new(
        projector: Arc<AbilityProjector>,
        chat: Arc<ChatArtifactSync>,
        channel: Arc<dyn AuthorityChannel>,
    ) -> Self {
        Self {
            projector,
            chat,
            channel,
        }
    }

    pub async fn request_reveal(
        &self,
        request: RevealRequest,
    ) -> Result<RevealOutcome, IdentificationError> {
        let phase = RevealPhase::Idle.transition(RevealPhase::Requested)?;
        tracing::debug!(item = %request.item(), phase = %phase, desired = request.desired_revealed, "Reveal requested");

        // Optimistic render must land before the authority is asked
        self.apply_optimistic(&request).await?;

        let stored = settle(
            self.channel.as_ref(),
            AuthorityRequest::SetRevealed {
                actor_id: request.actor_id.to_uuid(),
                item_id: request.item_id.to_uuid(),
                revealed: Some(request.desired_revealed),
            },
        )
        .await;

        let outcome = match stored {
            Settled::Applied => {
                let refreshed = self.refresh_canonical(&request).await?;
                tracing::info!(
                    item = %request.item(),
                    revealed = request.desired_revealed,
                    artifact_refreshed = refreshed,
                    "Reveal confirmed"
                );
                RevealOutcome::Confirmed {
                    artifact_refreshed: refreshed,
                }
            }
            Settled::NotFound(message) => {
                return Err(IdentificationError::entity_not_found(
                    "Item",
                    format!("{} ({})", request.item(), message),
                ));
            }
            Settled::Failed(reason) => {
                tracing::warn!(
                    item = %request.item(),
                    reason = %reason,
                    "Reveal not stored; chat may show stale state until next refresh"
                );
                RevealOutcome::Failed { reason }
            }
        };

        let idle = phase
            .transition(outcome.phase())
            .and_then(|settled| settled.transition(RevealPhase::Idle))?;
        tracing::debug!(item = %request.item(), phase = %idle, "Reveal interaction finished");
        Ok(outcome)
    }

    async fn apply_optimistic(&self, request: &RevealRequest) -> Result<(), IdentificationError> {
        let abilities: Vec<IdentifiableAbility> = self
            .projector
            .project(request.actor_id)
            .await?
            .into_iter()
            .map(|ability| {
                if ability.owned_item_id == request.item_id {
                    ability.with_checked(request.desired_revealed)
                } else {
                    ability
                }
            })
            .collect();

        self.chat
            .refresh_local(
                request.message_id,
                request.actor_id,
                &AbilityOverrides::with_abilities(abilities),
            )
            .await
    }

    async fn refresh_canonical(&self, request: &RevealRequest) -> Result<bool, IdentificationError> {
        let refreshed = settle(
            self.channel.as_ref(),
            AuthorityRequest::UpdateAbilityMessage {
                message_id: request.message_id.to_uuid(),
                actor_id: request.actor_id.to_uuid(),
                overrides: AbilityOverrides::none(),
            },
        )
        .await;

        match refreshed {
            Settled::Applied => Ok(true),
            Settled::NotFound(message) => Err(IdentificationError::entity_not_found(
                "ChatMessage",
                format!("{} ({})", request.message_id, message),
            )),
            Settled::Failed(reason) => {
                tracing::warn!(
                    message_id = %request.message_id,
                    reason = %reason,
                    "Reveal stored but chat message was not refreshed"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        ActorRepo, ChannelError, MockActorRepo, MockArtifactStore, MockAuthorityChannel,
        MockChatView, MockTemplateRenderer, TemplateContext,
    };
    use crate::use_cases::identification::StateStore;
    use serde_json::json;
    use veilkeep_domain::{Actor, OwnedItem, RuleProfile, FLAG_NAMESPACE, SETTING_KEY};
    use veilkeep_shared::{ErrorCode, ResponseResult};

    struct Fixture {
        actor: Actor,
        vial: ItemId,
        view: MockChatView,
        channel: MockAuthorityChannel,
    }

    impl Fixture {
        fn new() -> Self {
            let vial = OwnedItem::new("Potion of Flying", "loot").with_flag(
                FLAG_NAMESPACE,
                SETTING_KEY,
                json!({"isIdentifiable": true, "isIdentified": false, "unidentifiedName": "Strange Vial"}),
            );
            let vial_id = vial.id;
            Self {
                actor: Actor::new("Hero").with_item(vial),
                vial: vial_id,
                view: MockChatView::new(),
                channel: MockAuthorityChannel::new(),
            }
        }

        fn request(&self, desired_revealed: bool) -> RevealRequest {
            RevealRequest {
                actor_id: self.actor.id,
                item_id: self.vial,
                message_id: MessageId::new(),
                desired_revealed,
            }
        }

        fn build(self) -> RevealCoordinator {
            let actor = self.actor;
            let mut repo = MockActorRepo::new();
            repo.expect_get_actor()
                .returning(move |_| Ok(Some(actor.clone())));
            let repo: Arc<dyn ActorRepo> = Arc::new(repo);
            let state = Arc::new(StateStore::new(repo.clone(), RuleProfile::Dnd5e));
            let projector = Arc::new(AbilityProjector::new(repo, state));

            let mut renderer = MockTemplateRenderer::new();
            renderer.expect_render().returning(|_, context| match context {
                TemplateContext::AbilityList { items } => Ok(items
                    .iter()
                    .map(|item| format!("{}:{}", item.name, item.checked))
                    .collect::<Vec<_>>()
                    .join(",")),
                TemplateContext::SettingForm(_) => Ok(String::new()),
            });

            let chat = Arc::new(ChatArtifactSync::new(
                projector.clone(),
                Arc::new(renderer),
                Arc::new(MockArtifactStore::new()),
                Arc::new(self.view),
            ));
            RevealCoordinator::new(projector, chat, Arc::new(self.channel))
        }
    }

    #[tokio::test]
    async fn confirmed_reveal_refreshes_canonical_message() {
        let mut fixture = Fixture::new();
        fixture
            .view
            .expect_apply_local()
            .withf(|_, markup| markup == "Potion of Flying:true")
            .times(1)
            .return_const(());
        let mut seq = mockall::Sequence::new();
        fixture
            .channel
            .expect_invoke_as_authority()
            .withf(|request| matches!(request, AuthorityRequest::SetRevealed { revealed: Some(true), .. }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ResponseResult::success_empty()));
        fixture
            .channel
            .expect_invoke_as_authority()
            .withf(|request| matches!(request, AuthorityRequest::UpdateAbilityMessage { .. }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ResponseResult::success_empty()));
        let request = fixture.request(true);

        let outcome = fixture.build().request_reveal(request).await.unwrap();
        assert_eq!(outcome, RevealOutcome::Confirmed { artifact_refreshed: true });
        assert_eq!(outcome.phase(), RevealPhase::Confirmed);
    }

    #[tokio::test]
    async fn when_channel_unavailable_keeps_optimistic_render() {
        let mut fixture = Fixture::new();
        fixture
            .view
            .expect_apply_local()
            .withf(|_, markup| markup == "Potion of Flying:true")
            .times(1)
            .return_const(());
        fixture
            .channel
            .expect_invoke_as_authority()
            .times(1)
            .returning(|_| Err(ChannelError::Unavailable("no authority".into())));
        let request = fixture.request(true);

        let outcome = fixture.build().request_reveal(request).await.unwrap();
        assert!(matches!(outcome, RevealOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn when_authority_rejects_returns_failed() {
        let mut fixture = Fixture::new();
        fixture.view.expect_apply_local().return_const(());
        fixture
            .channel
            .expect_invoke_as_authority()
            .times(1)
            .returning(|_| Ok(ResponseResult::error(ErrorCode::Forbidden, "not the authority")));
        let request = fixture.request(true);

        let outcome = fixture.build().request_reveal(request).await.unwrap();
        assert!(!outcome.is_confirmed());
        assert_eq!(outcome.phase(), RevealPhase::Failed);
    }

    #[tokio::test]
    async fn when_authority_reports_not_found_returns_error() {
        let mut fixture = Fixture::new();
        fixture.view.expect_apply_local().return_const(());
        fixture
            .channel
            .expect_invoke_as_authority()
            .returning(|_| Ok(ResponseResult::error(ErrorCode::NotFound, "Item not found")));
        let request = fixture.request(true);

        let err = fixture.build().request_reveal(request).await.unwrap_err();
        assert!(err.is_entity_not_found());
    }

    #[tokio::test]
    async fn when_refresh_fails_reveal_is_still_confirmed() {
        let mut fixture = Fixture::new();
        fixture.view.expect_apply_local().return_const(());
        fixture
            .channel
            .expect_invoke_as_authority()
            .returning(|request| match request {
                AuthorityRequest::SetRevealed { .. } => Ok(ResponseResult::success_empty()),
                _ => Err(ChannelError::Timeout { timeout_ms: 10 }),
            });
        let request = fixture.request(false);

        let outcome = fixture.build().request_reveal(request).await.unwrap();
        assert_eq!(outcome, RevealOutcome::Confirmed { artifact_refreshed: false });
    }
}
