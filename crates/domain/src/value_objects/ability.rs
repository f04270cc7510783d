//! Display-ready view-model of a revealable ability.

use serde::{Deserialize, Serialize};

use crate::{ActorId, IdentifiabilitySetting, ItemId, OwnedItem};

/// One entry of an actor's revealable ability list.
///
/// Recomputed on every projection and never persisted. `revealed`,
/// `checked` and `disabled` always agree: a revealed entry cannot be
/// toggled again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiableAbility {
    pub actor_id: ActorId,
    pub owned_item_id: ItemId,
    /// Raw item name; substitution is left to the renderer
    pub name: String,
    pub img: String,
    pub html_description: String,
    pub unidentified_name: Option<String>,
    pub hide_original_name: bool,
    pub show_html_description: bool,
    pub show_img: bool,
    pub revealed: bool,
    pub checked: bool,
    pub disabled: bool,
}

impl IdentifiableAbility {
    pub fn from_item(actor_id: ActorId, item: &OwnedItem, setting: &IdentifiabilitySetting) -> Self {
        Self {
            actor_id,
            owned_item_id: item.id,
            name: item.name.clone(),
            img: item.img.clone(),
            html_description: item.description_html.clone(),
            unidentified_name: setting.unidentified_name.clone(),
            hide_original_name: false,
            show_html_description: false,
            show_img: false,
            revealed: false,
            checked: false,
            disabled: false,
        }
        .with_revealed(setting.is_identified)
    }

    /// Copy of this entry as it would look with the given reveal state.
    pub fn with_revealed(mut self, revealed: bool) -> Self {
        self.revealed = revealed;
        self.checked = revealed;
        self.disabled = revealed;
        self.show_html_description = revealed;
        self.show_img = revealed;
        self.hide_original_name = !revealed && self.unidentified_name.is_some();
        self
    }

    /// Copy of this entry with only its control state changed. Name, art
    /// and description gating stay as stored until the authority confirms.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.revealed = checked;
        self.checked = checked;
        self.disabled = checked;
        self
    }

    /// Copy of this entry with its control enabled regardless of reveal
    /// state; only the authority's own view uses this.
    pub fn unlocked(mut self) -> Self {
        self.disabled = false;
        self
    }

    /// Name a viewer without knowledge should see.
    pub fn display_name(&self) -> &str {
        match (&self.unidentified_name, self.hide_original_name) {
            (Some(alias), true) => alias,
            _ => &self.name,
        }
    }
}

/// Precomputed content for a render, replacing a fresh projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<IdentifiableAbility>>,
}

impl AbilityOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_abilities(abilities: Vec<IdentifiableAbility>) -> Self {
        Self {
            abilities: Some(abilities),
        }
    }
}
