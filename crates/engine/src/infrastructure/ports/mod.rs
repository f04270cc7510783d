//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host's actor/item storage and its attribute bag
//! - Template rendering of chat bodies and forms
//! - Chat artifact storage and the local chat view
//! - Reaching the session authority

mod authority;
mod error;
mod external;
mod repos;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::ActorRepo;

// =============================================================================
// External Collaborator Ports
// =============================================================================
pub use external::{
    ArtifactStore, ChatArtifact, ChatView, TemplateContext, TemplateRef, TemplateRenderer,
};

// =============================================================================
// Authority Ports
// =============================================================================
pub use authority::{AuthorityChannel, AuthorityHandler, HandlerContext};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockActorRepo;

#[cfg(test)]
pub use external::{MockArtifactStore, MockChatView, MockTemplateRenderer};

#[cfg(test)]
pub use authority::{MockAuthorityChannel, MockAuthorityHandler};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ArtifactError, ChannelError, RenderError, RepoError, SessionError};
