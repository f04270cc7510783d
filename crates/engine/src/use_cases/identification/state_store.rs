//! Reading and writing an item's identifiability setting.
//!
//! The setting lives in the item's attribute bag under
//! [`FLAG_NAMESPACE`]/[`SETTING_KEY`]. Whatever encoding an earlier version
//! wrote there is decoded once here; callers only ever see a clean
//! [`IdentifiabilitySetting`].

use std::sync::Arc;

use serde_json::{Map, Value};
use veilkeep_domain::{
    IdentifiabilityBadge, IdentifiabilitySetting, ItemRef, LegacyFlag, OwnedItem, RevealState,
    RuleProfile, FLAG_NAMESPACE, SETTING_KEY,
};

use super::IdentificationError;
use crate::infrastructure::ports::{ActorRepo, RepoError};

/// Identifiability state of items, backed by the host's attribute bag.
pub struct StateStore {
    actors: Arc<dyn ActorRepo>,
    profile: RuleProfile,
}

impl StateStore {
    pub fn new(actors: Arc<dyn ActorRepo>, profile: RuleProfile) -> Self {
        Self { actors, profile }
    }

    pub fn profile(&self) -> RuleProfile {
        self.profile
    }

    /// Effective setting of an already-loaded item.
    ///
    /// With nothing stored, the rule profile decides `is_identifiable` and the
    /// item is never identified.
    pub fn get_setting(&self, item: &OwnedItem) -> IdentifiabilitySetting {
        match item.flags.get(FLAG_NAMESPACE, SETTING_KEY) {
            None | Some(Value::Null) => IdentifiabilitySetting {
                is_identifiable: self.profile.infer_identifiable(item),
                ..IdentifiabilitySetting::default()
            },
            Some(Value::Object(fields)) => decode_fields(item, fields),
            Some(scalar) => {
                // Oldest stores kept a bare "identifiable" flag
                let flag = LegacyFlag::from_value(Some(scalar));
                log_ambiguous(item, "identifiability", &flag);
                IdentifiabilitySetting {
                    is_identifiable: flag.coerce_or(false),
                    ..IdentifiabilitySetting::default()
                }
            }
        }
    }

    /// Whether an explicit setting is stored, i.e. inference is bypassed.
    pub fn has_explicit_setting(&self, item: &OwnedItem) -> bool {
        !matches!(
            item.flags.get(FLAG_NAMESPACE, SETTING_KEY),
            None | Some(Value::Null)
        )
    }

    pub fn badge(&self, item: &OwnedItem) -> IdentifiabilityBadge {
        IdentifiabilityBadge::new(
            self.has_explicit_setting(item),
            self.get_setting(item).is_identifiable,
        )
    }

    /// Load an item, treating a missing one as a caller error.
    pub async fn resolve_item(&self, item: ItemRef) -> Result<OwnedItem, IdentificationError> {
        self.actors
            .get_item(item)
            .await?
            .ok_or_else(|| IdentificationError::entity_not_found("Item", item))
    }

    pub async fn get_setting_for(
        &self,
        item: ItemRef,
    ) -> Result<IdentifiabilitySetting, IdentificationError> {
        let owned = self.resolve_item(item).await?;
        Ok(self.get_setting(&owned))
    }

    /// Replace the whole setting, or clear it with `None` so the item falls
    /// back to inference.
    pub async fn set_setting(
        &self,
        item: ItemRef,
        setting: Option<IdentifiabilitySetting>,
    ) -> Result<(), IdentificationError> {
        self.resolve_item(item).await?;

        match setting {
            Some(setting) => {
                let value = serde_json::to_value(setting.normalized())
                    .map_err(RepoError::serialization)?;
                self.actors
                    .set_flag(item, FLAG_NAMESPACE, SETTING_KEY, value)
                    .await?;
                tracing::debug!(item = %item, "Stored identifiability setting");
            }
            None => {
                self.actors
                    .unset_flag(item, FLAG_NAMESPACE, SETTING_KEY)
                    .await?;
                tracing::debug!(item = %item, "Cleared identifiability setting");
            }
        }
        Ok(())
    }

    /// Set `is_identified`, keeping the rest of the effective setting.
    ///
    /// `None` clears the reveal. Items that are not identifiable are left
    /// untouched, since reveal state does not apply to them.
    pub async fn set_revealed(
        &self,
        item: ItemRef,
        revealed: Option<bool>,
    ) -> Result<IdentifiabilitySetting, IdentificationError> {
        let owned = self.resolve_item(item).await?;
        let current = self.get_setting(&owned);

        if current.reveal_state() == RevealState::NotApplicable {
            tracing::debug!(item = %item, "Ignoring reveal of a non-identifiable item");
            return Ok(current);
        }

        let next = current.with_identified(revealed.unwrap_or(false));
        self.set_setting(item, Some(next.clone())).await?;
        Ok(next)
    }
}

fn decode_fields(item: &OwnedItem, fields: &Map<String, Value>) -> IdentifiabilitySetting {
    let identifiable = LegacyFlag::from_value(fields.get("isIdentifiable"));
    let identified = LegacyFlag::from_value(fields.get("isIdentified"));
    log_ambiguous(item, "isIdentifiable", &identifiable);
    log_ambiguous(item, "isIdentified", &identified);

    IdentifiabilitySetting::from_stored_fields(
        &identifiable,
        &identified,
        fields.get("unidentifiedName").and_then(Value::as_str),
    )
    .normalized()
}

fn log_ambiguous(item: &OwnedItem, field: &'static str, flag: &LegacyFlag) {
    if flag.is_ambiguous() {
        tracing::debug!(
            item_id = %item.id,
            field,
            value = ?flag,
            "Legacy flag is not a recognised boolean encoding; using truthiness"
        );
    }
}
