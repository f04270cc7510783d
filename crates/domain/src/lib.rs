//! Veilkeep Domain - identifiability state model for tabletop items.
//!
//! Pure types only: ids, host entity snapshots, the stored setting and its
//! legacy decoding, inference profiles, and the ability view-model.

extern crate self as veilkeep_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{Actor, ItemCategory, ItemFlags, ItemRef, OwnedItem, Speaker};

pub use error::DomainError;

pub use ids::{ActorId, ItemId, MessageId, ParticipantId, RequestId};

pub use value_objects::{
    AbilityOverrides, IdentifiabilityBadge, IdentifiabilitySetting, IdentifiableAbility,
    LegacyFlag, RevealPhase, RevealState, RuleProfile, RuleProfileRegistry, FLAG_NAMESPACE,
    SETTING_KEY,
};
