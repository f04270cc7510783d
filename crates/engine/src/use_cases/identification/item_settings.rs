//! Item sheet controls: settings dialog, identifiable toggle and reset.
//!
//! All writes go through the authority as `setIdentifiability`.

use std::sync::Arc;

use veilkeep_domain::{IdentifiabilityBadge, IdentifiabilitySetting, ItemRef};
use veilkeep_shared::AuthorityRequest;

use super::{settle, IdentificationError, Settled, StateStore};
use crate::infrastructure::ports::{
    AuthorityChannel, TemplateContext, TemplateRef, TemplateRenderer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Saved,
    Failed { reason: String },
}

pub struct ItemSettings {
    state: Arc<StateStore>,
    renderer: Arc<dyn TemplateRenderer>,
    channel: Arc<dyn AuthorityChannel>,
}

impl ItemSettings {
    pub fn new(
        state: Arc<StateStore>,
        renderer: Arc<dyn TemplateRenderer>,
        channel: Arc<dyn AuthorityChannel>,
    ) -> Self {
        Self {
            state,
            renderer,
            channel,
        }
    }

    /// Edit form filled with the item's effective setting.
    pub async fn render_form(&self, item: ItemRef) -> Result<String, IdentificationError> {
        let setting = self.state.get_setting_for(item).await?;
        let markup = self
            .renderer
            .render(TemplateRef::SettingForm, TemplateContext::SettingForm(setting))
            .await?;
        Ok(markup)
    }

    /// Persist the whole submitted setting.
    pub async fn submit(
        &self,
        item: ItemRef,
        setting: IdentifiabilitySetting,
    ) -> Result<SettingsOutcome, IdentificationError> {
        self.store(item, Some(setting)).await
    }

    /// Flip `is_identifiable` relative to the effective value and store it
    /// explicitly. Turning it off also clears the reveal.
    pub async fn toggle_identifiable(
        &self,
        item: ItemRef,
    ) -> Result<SettingsOutcome, IdentificationError> {
        let current = self.state.get_setting_for(item).await?;
        let next = IdentifiabilitySetting {
            is_identifiable: !current.is_identifiable,
            ..current
        }
        .normalized();
        self.store(item, Some(next)).await
    }

    /// Drop the explicit setting; the item returns to inference.
    pub async fn reset(&self, item: ItemRef) -> Result<SettingsOutcome, IdentificationError> {
        self.store(item, None).await
    }

    pub async fn badge(&self, item: ItemRef) -> Result<IdentifiabilityBadge, IdentificationError> {
        let owned = self.state.resolve_item(item).await?;
        Ok(self.state.badge(&owned))
    }

    async fn store(
        &self,
        item: ItemRef,
        setting: Option<IdentifiabilitySetting>,
    ) -> Result<SettingsOutcome, IdentificationError> {
        let request = AuthorityRequest::SetIdentifiability {
            actor_id: item.actor_id.to_uuid(),
            item_id: item.item_id.to_uuid(),
            setting,
        };
        match settle(self.channel.as_ref(), request).await {
            Settled::Applied => Ok(SettingsOutcome::Saved),
            Settled::NotFound(message) => Err(IdentificationError::entity_not_found(
                "Item",
                format!("{} ({})", item, message),
            )),
            Settled::Failed(reason) => Ok(SettingsOutcome::Failed { reason }),
        }
    }
}
