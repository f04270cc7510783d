//! External collaborator port traits (templating, chat artifacts, chat view).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veilkeep_domain::{IdentifiabilitySetting, IdentifiableAbility, MessageId, Speaker};

use super::error::{ArtifactError, RenderError};

// =============================================================================
// Templating
// =============================================================================

/// Templates the engine knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateRef {
    /// Chat body listing an actor's identifiable abilities
    AbilityList,
    /// Item settings edit form
    SettingForm,
}

impl TemplateRef {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AbilityList => "ability-list",
            Self::SettingForm => "setting-form",
        }
    }
}

/// Data handed to a template. One shape per [`TemplateRef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateContext {
    AbilityList { items: Vec<IdentifiableAbility> },
    SettingForm(IdentifiabilitySetting),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(
        &self,
        template: TemplateRef,
        context: TemplateContext,
    ) -> Result<String, RenderError>;
}

// =============================================================================
// Chat artifacts
// =============================================================================

/// A persisted chat message as seen by every participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatArtifact {
    pub id: MessageId,
    pub content: String,
    pub speaker: Speaker,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Durable chat message storage shared by the session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn create(&self, content: String, speaker: Speaker) -> Result<MessageId, ArtifactError>;
    async fn update(&self, id: MessageId, content: String) -> Result<(), ArtifactError>;
    async fn get(&self, id: MessageId) -> Result<Option<ChatArtifact>, ArtifactError>;
}

/// The current participant's rendering of the chat log.
///
/// Writes here are never seen by anyone else.
#[cfg_attr(test, mockall::automock)]
pub trait ChatView: Send + Sync {
    fn apply_local(&self, id: MessageId, markup: &str);
}
