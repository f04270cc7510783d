//! Test fixtures: sample actors and a wired two-participant session.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{hero, TestSession};
//!
//! let (actor, items) = hero();
//! let session = TestSession::start(vec![actor]).await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use veilkeep_domain::{Actor, ActorId, ItemId, ItemRef, OwnedItem, RuleProfile, FLAG_NAMESPACE, SETTING_KEY};

use crate::api::UiEventRouter;
use crate::app::App;
use crate::infrastructure::chat_log::{InMemoryChatLog, LocalChatView};
use crate::infrastructure::memory_store::InMemoryActorRepo;
use crate::infrastructure::session_hub::{HubChannel, ParticipantRole, SessionHub};
use crate::infrastructure::templates::HtmlTemplates;

// =============================================================================
// Sample items
// =============================================================================

/// Hidden potion with an alias: `Strange Vial`.
pub fn strange_vial() -> OwnedItem {
    OwnedItem::new("Potion of Flying", "consumable")
        .with_img("icons/vial.webp")
        .with_description("<p>You gain a flying speed of 60 feet.</p>")
        .with_flag(
            FLAG_NAMESPACE,
            SETTING_KEY,
            json!({"isIdentifiable": true, "isIdentified": false, "unidentifiedName": "Strange Vial"}),
        )
}

/// Explicitly not identifiable.
pub fn plain_rock() -> OwnedItem {
    OwnedItem::new("Plain Rock", "loot").with_flag(
        FLAG_NAMESPACE,
        SETTING_KEY,
        json!({"isIdentifiable": false}),
    )
}

/// No stored setting; identifiable by inference (activated equipment).
pub fn wand_of_sparks() -> OwnedItem {
    OwnedItem::new("Wand of Sparks", "equipment")
        .with_activation("action")
        .with_description("<p>Sparks fly.</p>")
}

/// No stored setting; spells are never inferred identifiable.
pub fn fireball() -> OwnedItem {
    OwnedItem::new("Fireball", "spell").with_activation("action")
}

/// Item ids of [`hero`]'s inventory.
#[derive(Debug, Clone, Copy)]
pub struct HeroItems {
    pub vial: ItemId,
    pub rock: ItemId,
    pub wand: ItemId,
    pub fireball: ItemId,
}

pub fn hero() -> (Actor, HeroItems) {
    let vial = strange_vial();
    let rock = plain_rock();
    let wand = wand_of_sparks();
    let spell = fireball();
    let items = HeroItems {
        vial: vial.id,
        rock: rock.id,
        wand: wand.id,
        fireball: spell.id,
    };
    let actor = Actor::new("Aria")
        .with_item(vial)
        .with_item(rock)
        .with_item(wand)
        .with_item(spell);
    (actor, items)
}

pub fn item(actor_id: ActorId, item_id: ItemId) -> ItemRef {
    ItemRef::new(actor_id, item_id)
}

// =============================================================================
// Session wiring
// =============================================================================

/// One connected participant with its own chat view.
pub struct Participant {
    pub app: Arc<App>,
    pub channel: Arc<HubChannel>,
    pub view: Arc<LocalChatView>,
    pub router: UiEventRouter,
}

/// A hub with one authority and one player sharing an actor store and chat log.
pub struct TestSession {
    pub hub: Arc<SessionHub>,
    pub actors: Arc<InMemoryActorRepo>,
    pub log: Arc<InMemoryChatLog>,
    pub authority: Participant,
    pub player: Participant,
}

impl TestSession {
    pub async fn start(actors: Vec<Actor>) -> Self {
        Self::start_with_timeout(actors, Duration::from_secs(2)).await
    }

    pub async fn start_with_timeout(actors: Vec<Actor>, timeout: Duration) -> Self {
        let hub = SessionHub::new(timeout, 64);
        let actors = Arc::new(InMemoryActorRepo::with_actors(actors));
        let log = Arc::new(InMemoryChatLog::new());

        let authority = join(&hub, ParticipantRole::Authority, &actors, &log).await;
        let player = join(&hub, ParticipantRole::Player, &actors, &log).await;

        Self {
            hub,
            actors,
            log,
            authority,
            player,
        }
    }
}

pub async fn join(
    hub: &Arc<SessionHub>,
    role: ParticipantRole,
    actors: &Arc<InMemoryActorRepo>,
    log: &Arc<InMemoryChatLog>,
) -> Participant {
    let channel = Arc::new(
        hub.join(role)
            .await
            .unwrap_or_else(|e| panic!("failed to join as {:?}: {}", role, e)),
    );
    let view = Arc::new(LocalChatView::new(log.clone()));
    let app = Arc::new(App::new(
        actors.clone(),
        Arc::new(HtmlTemplates::new()),
        log.clone(),
        view.clone(),
        channel.clone(),
        RuleProfile::Dnd5e,
    ));
    Participant {
        router: UiEventRouter::new(app.clone()),
        app,
        channel,
        view,
    }
}
