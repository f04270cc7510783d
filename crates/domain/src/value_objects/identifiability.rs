//! Identifiability setting stored on an item's attribute bag.

use serde::{Deserialize, Serialize};

use crate::common::none_if_blank;

use super::legacy_flag::LegacyFlag;

/// Attribute-bag namespace owned by Veilkeep.
pub const FLAG_NAMESPACE: &str = "veilkeep";

/// Attribute-bag key holding the serialized [`IdentifiabilitySetting`].
pub const SETTING_KEY: &str = "identifiability";

/// Whether an item takes part in the reveal workflow and whether it has
/// been revealed.
///
/// `is_identified` only means something while `is_identifiable` is true;
/// use [`IdentifiabilitySetting::reveal_state`] rather than reading it raw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiabilitySetting {
    pub is_identifiable: bool,
    pub is_identified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unidentified_name: Option<String>,
}

/// Reveal state as the rest of the system should interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// The item does not take part in the workflow
    NotApplicable,
    Hidden,
    Revealed,
}

impl IdentifiabilitySetting {
    /// An item outside the reveal workflow.
    pub fn not_identifiable() -> Self {
        Self::default()
    }

    /// An identifiable item that has not been revealed yet.
    pub fn hidden() -> Self {
        Self {
            is_identifiable: true,
            ..Self::default()
        }
    }

    pub fn with_identified(mut self, is_identified: bool) -> Self {
        self.is_identified = is_identified;
        self
    }

    pub fn with_unidentified_name(mut self, name: impl Into<String>) -> Self {
        self.unidentified_name = Some(name.into());
        self
    }

    /// Builds a setting from individually decoded stored fields.
    ///
    /// Missing flags default to false.
    pub fn from_stored_fields(
        is_identifiable: &LegacyFlag,
        is_identified: &LegacyFlag,
        unidentified_name: Option<&str>,
    ) -> Self {
        Self {
            is_identifiable: is_identifiable.coerce_or(false),
            is_identified: is_identified.coerce_or(false),
            unidentified_name: unidentified_name
                .and_then(none_if_blank)
                .map(str::to_string),
        }
    }

    /// Canonical form for persistence.
    ///
    /// A non-identifiable item cannot carry a reveal, and a blank
    /// unidentified name is the same as none.
    pub fn normalized(mut self) -> Self {
        if !self.is_identifiable {
            self.is_identified = false;
        }
        self.unidentified_name = self
            .unidentified_name
            .as_deref()
            .and_then(none_if_blank)
            .map(|name| name.trim().to_string());
        self
    }

    pub fn reveal_state(&self) -> RevealState {
        match (self.is_identifiable, self.is_identified) {
            (false, _) => RevealState::NotApplicable,
            (true, false) => RevealState::Hidden,
            (true, true) => RevealState::Revealed,
        }
    }

    /// True when the renderer should show `unidentified_name` instead of
    /// the item's real name.
    pub fn hides_original_name(&self) -> bool {
        !self.is_identified && self.unidentified_name.is_some()
    }
}

/// Four-state indicator shown on an item sheet's identifiability button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifiabilityBadge {
    ExplicitOn,
    ExplicitOff,
    InferredOn,
    InferredOff,
}

impl IdentifiabilityBadge {
    pub fn new(explicit: bool, identifiable: bool) -> Self {
        match (explicit, identifiable) {
            (true, true) => Self::ExplicitOn,
            (true, false) => Self::ExplicitOff,
            (false, true) => Self::InferredOn,
            (false, false) => Self::InferredOff,
        }
    }
}
