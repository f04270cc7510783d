//! Legacy inference rules, selected per host game system.
//!
//! Items created before explicit settings existed carry no
//! [`IdentifiabilitySetting`](super::IdentifiabilitySetting). For those, a
//! [`RuleProfile`] decides whether the item is identifiable. The table is a
//! frozen compatibility shim: it must keep answering exactly as it always has.

use std::collections::HashMap;

use crate::{ItemCategory, OwnedItem};

/// Closed set of inference behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleProfile {
    /// Category/activation table used by the original dnd5e integration:
    ///
    /// | category | identifiable |
    /// |---|---|
    /// | spell | never |
    /// | weapon, equipment, feat | iff activation type is non-empty |
    /// | anything else | never |
    Dnd5e,
    /// Never infer; only explicit settings make an item identifiable.
    ExplicitOnly,
}

impl RuleProfile {
    pub fn infer_identifiable(&self, item: &OwnedItem) -> bool {
        match self {
            Self::Dnd5e => match item.category {
                // what spells a character knows is not hidden by this mechanism
                ItemCategory::Spell => false,
                ItemCategory::Weapon | ItemCategory::Equipment | ItemCategory::Feat => {
                    item.has_activation()
                }
                ItemCategory::Other(_) => false,
            },
            Self::ExplicitOnly => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dnd5e => "dnd5e",
            Self::ExplicitOnly => "explicit_only",
        }
    }
}

/// Maps host system ids to inference profiles.
///
/// Resolved once at startup; unknown ids get the registry default.
#[derive(Debug, Clone)]
pub struct RuleProfileRegistry {
    profiles: HashMap<String, RuleProfile>,
    fallback: RuleProfile,
}

impl Default for RuleProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleProfileRegistry {
    /// Registry with the built-in profiles. Unknown systems use the dnd5e
    /// table, which is how every system behaved before profiles existed.
    pub fn new() -> Self {
        let mut registry = Self::empty(RuleProfile::Dnd5e);
        registry.register("dnd5e", RuleProfile::Dnd5e);
        registry
    }

    pub fn empty(fallback: RuleProfile) -> Self {
        Self {
            profiles: HashMap::new(),
            fallback,
        }
    }

    pub fn with_fallback(mut self, fallback: RuleProfile) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn register(&mut self, system_id: impl Into<String>, profile: RuleProfile) {
        self.profiles.insert(system_id.into(), profile);
    }

    pub fn resolve(&self, system_id: &str) -> RuleProfile {
        self.profiles
            .get(system_id)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn list_systems(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
