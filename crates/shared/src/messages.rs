//! Messages exchanged between session participants.
//!
//! - [`AuthorityRequest`]: operations only the authority may apply
//! - [`AuthorityEnvelope`]: a request plus its correlation id
//! - [`ClientEvent`]: raw UI events, before validation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AbilityOverrides, IdentifiabilitySetting};

/// Wire name of the reveal mutation.
pub const OP_SET_REVEALED: &str = "setRevealed";
/// Wire name of the canonical chat refresh.
pub const OP_UPDATE_ABILITY_MESSAGE: &str = "updateAbilityMessage";
/// Wire name of the full setting write.
pub const OP_SET_IDENTIFIABILITY: &str = "setIdentifiability";

/// A named operation executed by whichever participant holds authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AuthorityRequest {
    /// Set (or clear, with `None`) the reveal state of one item
    SetRevealed {
        actor_id: Uuid,
        item_id: Uuid,
        revealed: Option<bool>,
    },
    /// Re-render an ability message from canonical state and persist it
    UpdateAbilityMessage {
        message_id: Uuid,
        actor_id: Uuid,
        #[serde(default)]
        overrides: AbilityOverrides,
    },
    /// Replace (or clear, with `None`) an item's whole setting
    SetIdentifiability {
        actor_id: Uuid,
        item_id: Uuid,
        setting: Option<IdentifiabilitySetting>,
    },
}

impl AuthorityRequest {
    /// Name under which a handler for this request is registered.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetRevealed { .. } => OP_SET_REVEALED,
            Self::UpdateAbilityMessage { .. } => OP_UPDATE_ABILITY_MESSAGE,
            Self::SetIdentifiability { .. } => OP_SET_IDENTIFIABILITY,
        }
    }

    /// Actor every operation is scoped to.
    pub fn actor_id(&self) -> Uuid {
        match self {
            Self::SetRevealed { actor_id, .. }
            | Self::UpdateAbilityMessage { actor_id, .. }
            | Self::SetIdentifiability { actor_id, .. } => *actor_id,
        }
    }
}

/// Correlated request as carried by a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityEnvelope {
    pub request_id: Uuid,
    /// Participant that initiated the request
    pub origin: Uuid,
    pub request: AuthorityRequest,
}

/// Raw UI events as extracted by the host adapter.
///
/// Ids are whatever the adapter could scrape from the markup and may be
/// missing or malformed; they are validated before reaching the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Checkbox in an ability message changed
    RevealToggled {
        #[serde(default)]
        actor_id: Option<String>,
        #[serde(default)]
        item_id: Option<String>,
        #[serde(default)]
        message_id: Option<String>,
        desired_checked: bool,
    },
    /// Item settings dialog submitted
    SettingsSubmitted {
        #[serde(default)]
        actor_id: Option<String>,
        #[serde(default)]
        item_id: Option<String>,
        setting: IdentifiabilitySetting,
    },
    /// Item sheet header button clicked
    IdentifiableToggled {
        #[serde(default)]
        actor_id: Option<String>,
        #[serde(default)]
        item_id: Option<String>,
    },
    /// Item sheet header button right-clicked
    IdentifiableReset {
        #[serde(default)]
        actor_id: Option<String>,
        #[serde(default)]
        item_id: Option<String>,
    },
    /// Post an actor's ability list to chat
    PrintAbilities {
        #[serde(default)]
        actor_id: Option<String>,
    },
}
