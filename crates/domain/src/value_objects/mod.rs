//! Value objects for identifiability state and ability projection.

mod ability;
mod identifiability;
mod legacy_flag;
mod reveal_phase;
mod rule_profile;

pub use ability::{AbilityOverrides, IdentifiableAbility};
pub use identifiability::{
    IdentifiabilityBadge, IdentifiabilitySetting, RevealState, FLAG_NAMESPACE, SETTING_KEY,
};
pub use legacy_flag::LegacyFlag;
pub use reveal_phase::RevealPhase;
pub use rule_profile::{RuleProfile, RuleProfileRegistry};
