//! In-memory chat log and per-participant chat views.
//!
//! [`InMemoryChatLog`] is the durable store shared by the session.
//! [`LocalChatView`] is one participant's rendering of it: a local write
//! overlays a message until the canonical content changes underneath it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use veilkeep_domain::{MessageId, Speaker};

use super::ports::{ArtifactError, ArtifactStore, ChatArtifact, ChatView};

#[derive(Debug, Clone)]
struct LoggedMessage {
    artifact: ChatArtifact,
    position: u64,
    version: u64,
}

#[derive(Default)]
pub struct InMemoryChatLog {
    messages: DashMap<MessageId, LoggedMessage>,
    next_position: AtomicU64,
}

impl InMemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of canonical writes applied to a message.
    pub fn version(&self, id: MessageId) -> Option<u64> {
        self.messages.get(&id).map(|message| message.version)
    }

    /// All messages in posting order.
    pub fn transcript(&self) -> Vec<ChatArtifact> {
        let mut messages: Vec<_> = self
            .messages
            .iter()
            .map(|entry| (entry.position, entry.artifact.clone()))
            .collect();
        messages.sort_by_key(|(position, _)| *position);
        messages.into_iter().map(|(_, artifact)| artifact).collect()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryChatLog {
    async fn create(&self, content: String, speaker: Speaker) -> Result<MessageId, ArtifactError> {
        let id = MessageId::new();
        let now = Utc::now();
        let position = self.next_position.fetch_add(1, Ordering::SeqCst);
        self.messages.insert(
            id,
            LoggedMessage {
                artifact: ChatArtifact {
                    id,
                    content,
                    speaker,
                    created_at: now,
                    updated_at: now,
                },
                position,
                version: 1,
            },
        );
        tracing::debug!(message_id = %id, "Chat message created");
        Ok(id)
    }

    async fn update(&self, id: MessageId, content: String) -> Result<(), ArtifactError> {
        let mut message = self
            .messages
            .get_mut(&id)
            .ok_or_else(|| ArtifactError::NotFound(id.to_string()))?;
        message.artifact.content = content;
        message.artifact.updated_at = Utc::now();
        message.version += 1;
        Ok(())
    }

    async fn get(&self, id: MessageId) -> Result<Option<ChatArtifact>, ArtifactError> {
        Ok(self.messages.get(&id).map(|message| message.artifact.clone()))
    }
}

#[derive(Debug, Clone)]
struct Overlay {
    markup: String,
    base_version: Option<u64>,
}

/// One participant's view of the shared chat log.
pub struct LocalChatView {
    log: Arc<InMemoryChatLog>,
    overlays: DashMap<MessageId, Overlay>,
}

impl LocalChatView {
    pub fn new(log: Arc<InMemoryChatLog>) -> Self {
        Self {
            log,
            overlays: DashMap::new(),
        }
    }

    /// What this participant currently sees for a message.
    ///
    /// An overlay taken against an older canonical version is dropped here.
    pub fn visible(&self, id: MessageId) -> Option<String> {
        let canonical = self.log.messages.get(&id).map(|message| {
            (message.version, message.artifact.content.clone())
        });
        if let Some((version, _)) = &canonical {
            self.overlays
                .remove_if(&id, |_, overlay| overlay.base_version != Some(*version));
        }

        let overlay = self.overlays.get(&id).map(|overlay| overlay.markup.clone());
        match (overlay, canonical) {
            (Some(markup), _) => Some(markup),
            (None, Some((_, content))) => Some(content),
            (None, None) => None,
        }
    }

    pub fn has_overlay(&self, id: MessageId) -> bool {
        self.overlays.contains_key(&id)
    }
}

impl ChatView for LocalChatView {
    fn apply_local(&self, id: MessageId, markup: &str) {
        self.overlays.insert(
            id,
            Overlay {
                markup: markup.to_string(),
                base_version: self.log.version(id),
            },
        );
        tracing::debug!(message_id = %id, "Applied local chat render");
    }
}
