//! Reveal flow scenarios.
//!
//! - Optimistic render with an unreachable authority
//! - Confirmed reveal converging every participant's chat view
//! - Out-of-order confirmations on one actor
//! - Redelivered requests and unknown items

use veilkeep_domain::{Actor, ActorId, ItemId, MessageId};
use veilkeep_shared::{AuthorityRequest, ClientEvent};

use crate::api::UiOutcome;
use crate::infrastructure::ports::{AuthorityChannel, ChannelError};
use crate::test_fixtures::{hero, item, plain_rock, strange_vial, TestSession};
use crate::use_cases::identification::{RevealOutcome, RevealRequest};

async fn print_as_player(session: &TestSession, actor_id: ActorId) -> MessageId {
    match session
        .player
        .router
        .handle(ClientEvent::PrintAbilities {
            actor_id: Some(actor_id.to_string()),
        })
        .await
        .unwrap()
    {
        UiOutcome::Printed(message_id) => message_id,
        other => panic!("expected a printed message, got {:?}", other),
    }
}

fn toggle(actor_id: ActorId, item_id: ItemId, message_id: MessageId, checked: bool) -> ClientEvent {
    ClientEvent::RevealToggled {
        actor_id: Some(actor_id.to_string()),
        item_id: Some(item_id.to_string()),
        message_id: Some(message_id.to_string()),
        desired_checked: checked,
    }
}

async fn canonical(session: &TestSession, message_id: MessageId) -> String {
    use crate::infrastructure::ports::ArtifactStore;
    session
        .log
        .get(message_id)
        .await
        .unwrap()
        .map(|artifact| artifact.content)
        .unwrap_or_default()
}

#[tokio::test]
async fn unreachable_authority_keeps_optimistic_render_only() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;

    session.hub.set_reachable(false);
    let outcome = session
        .player
        .router
        .handle(toggle(actor_id, items.vial, message_id, true))
        .await
        .unwrap();
    assert!(matches!(outcome, UiOutcome::Reveal(RevealOutcome::Failed { .. })));

    // The acting player sees the entry checked, still under its alias
    let local = session.player.view.visible(message_id).unwrap();
    assert!(local.contains(" checked disabled"));
    assert!(local.contains("Strange Vial"));
    assert!(!local.contains("Potion of Flying"));
    assert!(!local.contains("flying speed"));
    assert!(!local.contains("icons/vial.webp"));

    // Nobody else does, and nothing canonical changed
    let shared = canonical(&session, message_id).await;
    assert!(shared.contains("Strange Vial"));
    assert!(!shared.contains(" checked"));
    assert_eq!(session.authority.view.visible(message_id), Some(shared));

    let setting = session
        .player
        .app
        .use_cases
        .identification
        .state
        .get_setting_for(item(actor_id, items.vial))
        .await
        .unwrap();
    assert!(!setting.is_identified);
}

#[tokio::test]
async fn confirmed_reveal_converges_every_view() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;

    let outcome = session
        .player
        .router
        .handle(toggle(actor_id, items.vial, message_id, true))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        UiOutcome::Reveal(RevealOutcome::Confirmed {
            artifact_refreshed: true
        })
    );

    let shared = canonical(&session, message_id).await;
    assert!(shared.contains("Potion of Flying"));
    assert!(shared.contains(" checked disabled"));
    assert_eq!(session.player.view.visible(message_id), Some(shared.clone()));
    assert_eq!(session.authority.view.visible(message_id), Some(shared));

    let setting = session
        .authority
        .app
        .use_cases
        .identification
        .state
        .get_setting_for(item(actor_id, items.vial))
        .await
        .unwrap();
    assert!(setting.is_identified);
}

#[tokio::test]
async fn repeating_a_stored_reveal_still_refreshes_the_message() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;
    let before = session.log.version(message_id).unwrap();

    let reveal = RevealRequest {
        actor_id,
        item_id: items.wand,
        message_id,
        desired_revealed: false,
    };
    let outcome = session
        .player
        .app
        .use_cases
        .identification
        .reveal
        .request_reveal(reveal)
        .await
        .unwrap();

    assert!(outcome.is_confirmed());
    assert_eq!(session.log.version(message_id), Some(before + 1));
}

#[tokio::test]
async fn out_of_order_confirmations_both_apply() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;

    let first = session.player.channel.envelope(AuthorityRequest::SetRevealed {
        actor_id: actor_id.to_uuid(),
        item_id: items.vial.to_uuid(),
        revealed: Some(true),
    });
    let second = session.player.channel.envelope(AuthorityRequest::SetRevealed {
        actor_id: actor_id.to_uuid(),
        item_id: items.wand.to_uuid(),
        revealed: Some(true),
    });

    // Authority processes the later request first
    assert!(session.hub.deliver(second).await.unwrap().is_success());
    assert!(session.hub.deliver(first).await.unwrap().is_success());

    let abilities = session
        .player
        .app
        .use_cases
        .identification
        .projector
        .project(actor_id)
        .await
        .unwrap();
    assert_eq!(abilities.len(), 2);
    assert!(abilities.iter().all(|ability| ability.revealed));
}

#[tokio::test]
async fn concurrent_reveals_on_one_actor_both_confirm() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;
    let reveal = &session.player.app.use_cases.identification.reveal;

    let (vial, wand) = tokio::join!(
        reveal.request_reveal(RevealRequest {
            actor_id,
            item_id: items.vial,
            message_id,
            desired_revealed: true,
        }),
        reveal.request_reveal(RevealRequest {
            actor_id,
            item_id: items.wand,
            message_id,
            desired_revealed: true,
        }),
    );
    assert!(vial.unwrap().is_confirmed());
    assert!(wand.unwrap().is_confirmed());

    // Last canonical refresh reads both stored reveals
    let shared = canonical(&session, message_id).await;
    assert!(shared.contains("Potion of Flying"));
    assert_eq!(shared.matches(" checked disabled").count(), 2);
}

#[tokio::test]
async fn redelivered_request_is_not_applied_twice() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let state = &session.player.app.use_cases.identification.state;

    let reveal = session.player.channel.envelope(AuthorityRequest::SetRevealed {
        actor_id: actor_id.to_uuid(),
        item_id: items.vial.to_uuid(),
        revealed: Some(true),
    });
    session.hub.deliver(reveal.clone()).await.unwrap();

    // Un-reveal through a fresh request
    let response = session
        .authority
        .channel
        .invoke_as_authority(AuthorityRequest::SetRevealed {
            actor_id: actor_id.to_uuid(),
            item_id: items.vial.to_uuid(),
            revealed: None,
        })
        .await
        .unwrap();
    assert!(response.is_success());

    // A late duplicate of the first request must not re-reveal
    session.hub.deliver(reveal).await.unwrap();
    let setting = state.get_setting_for(item(actor_id, items.vial)).await.unwrap();
    assert!(setting.is_identifiable);
    assert!(!setting.is_identified);
}

#[tokio::test]
async fn unknown_item_is_a_fatal_error() {
    let (actor, _) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;

    let result = session
        .player
        .router
        .handle(toggle(actor_id, ItemId::new(), message_id, true))
        .await;
    assert!(result.unwrap_err().is_entity_not_found());
}

#[tokio::test]
async fn unknown_actor_is_a_fatal_error() {
    let session = TestSession::start(Vec::new()).await;
    let result = session
        .player
        .router
        .handle(toggle(ActorId::new(), ItemId::new(), MessageId::new(), true))
        .await;
    assert!(result.unwrap_err().is_entity_not_found());
}

#[tokio::test]
async fn malformed_toggle_is_ignored() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;
    let before = canonical(&session, message_id).await;

    let outcome = session
        .player
        .router
        .handle(ClientEvent::RevealToggled {
            actor_id: Some(actor_id.to_string()),
            item_id: Some(items.vial.to_string()),
            message_id: None,
            desired_checked: true,
        })
        .await
        .unwrap();

    assert_eq!(outcome, UiOutcome::Ignored);
    assert_eq!(canonical(&session, message_id).await, before);
    assert!(!session.player.view.has_overlay(message_id));
}

#[tokio::test]
async fn strange_vial_projection_keeps_raw_name() {
    let actor = Actor::new("Aria")
        .with_item(strange_vial())
        .with_item(plain_rock());
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let projector = &session.player.app.use_cases.identification.projector;

    let first = projector.project(actor_id).await.unwrap();
    let second = projector.project(actor_id).await.unwrap();
    assert_eq!(first, second);

    assert_eq!(first.len(), 1);
    let vial = &first[0];
    assert_eq!(vial.name, "Potion of Flying");
    assert_eq!(vial.unidentified_name.as_deref(), Some("Strange Vial"));
    assert!(vial.hide_original_name);
    assert!(!vial.revealed && !vial.checked && !vial.disabled);
}

#[tokio::test]
async fn authority_print_leaves_revealed_entries_enabled_locally() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    session
        .authority
        .channel
        .invoke_as_authority(AuthorityRequest::SetRevealed {
            actor_id: actor_id.to_uuid(),
            item_id: items.vial.to_uuid(),
            revealed: Some(true),
        })
        .await
        .unwrap();

    let message_id = session
        .authority
        .app
        .use_cases
        .identification
        .print
        .execute(actor_id)
        .await
        .unwrap();

    let authority_view = session.authority.view.visible(message_id).unwrap();
    assert!(authority_view.contains(" checked"));
    assert!(!authority_view.contains(" disabled"));

    let player_view = session.player.view.visible(message_id).unwrap();
    assert!(player_view.contains(" checked disabled"));
}

#[tokio::test]
async fn authority_leaving_makes_reveals_fail_softly() {
    let (actor, items) = hero();
    let actor_id = actor.id;
    let session = TestSession::start(vec![actor]).await;
    let message_id = print_as_player(&session, actor_id).await;

    session
        .hub
        .leave(session.authority.channel.participant_id())
        .await
        .unwrap();

    let result = session
        .player
        .channel
        .invoke_as_authority(AuthorityRequest::UpdateAbilityMessage {
            message_id: message_id.to_uuid(),
            actor_id: actor_id.to_uuid(),
            overrides: Default::default(),
        })
        .await;
    assert!(matches!(result, Err(ChannelError::Unavailable(_))));

    let outcome = session
        .player
        .router
        .handle(toggle(actor_id, items.vial, message_id, true))
        .await
        .unwrap();
    assert!(matches!(outcome, UiOutcome::Reveal(RevealOutcome::Failed { .. })));
}
