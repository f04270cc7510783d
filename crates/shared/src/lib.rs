//! Veilkeep Shared - types exchanged between session participants
//!
//! - Authority operations and their correlation envelope
//! - The response envelope and error codes
//! - Raw UI events produced by the host adapter
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, uuid, serde_json and the domain vocabulary
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Raw ids on the wire** - `uuid::Uuid` in requests, unvalidated strings in UI events

pub mod messages;
pub mod responses;

// Re-export shared vocabulary types from the domain
pub use veilkeep_domain::{AbilityOverrides, IdentifiabilitySetting, IdentifiableAbility};

pub use messages::{
    AuthorityEnvelope, AuthorityRequest, ClientEvent, OP_SET_IDENTIFIABILITY, OP_SET_REVEALED,
    OP_UPDATE_ABILITY_MESSAGE,
};
pub use responses::{ErrorCode, ResponseResult};
