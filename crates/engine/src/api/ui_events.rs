//! UI event adapter.
//!
//! Translates raw [`ClientEvent`]s from the host into use case calls.
//! Events with missing or unparseable ids are dropped here and never reach
//! the identification workflow.

use std::str::FromStr;
use std::sync::Arc;

use veilkeep_domain::{ActorId, DomainError, IdentifiabilitySetting, ItemId, ItemRef, MessageId};
use veilkeep_shared::ClientEvent;

use crate::app::App;
use crate::use_cases::identification::{
    IdentificationError, RevealOutcome, RevealRequest, SettingsOutcome,
};

#[derive(Debug, thiserror::Error)]
pub enum UiEventError {
    #[error("Malformed UI event: {0}")]
    Malformed(String),
}

/// A UI event whose ids have been validated.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Reveal(RevealRequest),
    SubmitSettings {
        item: ItemRef,
        setting: IdentifiabilitySetting,
    },
    ToggleIdentifiable(ItemRef),
    ResetIdentifiable(ItemRef),
    PrintAbilities(ActorId),
}

impl TryFrom<ClientEvent> for UiCommand {
    type Error = UiEventError;

    fn try_from(event: ClientEvent) -> Result<Self, Self::Error> {
        match event {
            ClientEvent::RevealToggled {
                actor_id,
                item_id,
                message_id,
                desired_checked,
            } => Ok(Self::Reveal(RevealRequest {
                actor_id: required("actorId", actor_id)?,
                item_id: required("itemId", item_id)?,
                message_id: required::<MessageId>("messageId", message_id)?,
                desired_revealed: desired_checked,
            })),
            ClientEvent::SettingsSubmitted {
                actor_id,
                item_id,
                setting,
            } => Ok(Self::SubmitSettings {
                item: item_ref(actor_id, item_id)?,
                setting,
            }),
            ClientEvent::IdentifiableToggled { actor_id, item_id } => {
                Ok(Self::ToggleIdentifiable(item_ref(actor_id, item_id)?))
            }
            ClientEvent::IdentifiableReset { actor_id, item_id } => {
                Ok(Self::ResetIdentifiable(item_ref(actor_id, item_id)?))
            }
            ClientEvent::PrintAbilities { actor_id } => {
                Ok(Self::PrintAbilities(required("actorId", actor_id)?))
            }
        }
    }
}

fn required<T>(field: &'static str, raw: Option<String>) -> Result<T, UiEventError>
where
    T: FromStr<Err = DomainError>,
{
    let raw = raw.ok_or_else(|| UiEventError::Malformed(format!("missing {}", field)))?;
    raw.parse()
        .map_err(|e: DomainError| UiEventError::Malformed(format!("{}: {}", field, e)))
}

fn item_ref(actor_id: Option<String>, item_id: Option<String>) -> Result<ItemRef, UiEventError> {
    Ok(ItemRef::new(
        required::<ActorId>("actorId", actor_id)?,
        required::<ItemId>("itemId", item_id)?,
    ))
}

/// What handling a UI event led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiOutcome {
    /// Malformed event; nothing happened
    Ignored,
    Reveal(RevealOutcome),
    Settings(SettingsOutcome),
    Printed(MessageId),
}

/// Routes validated UI events to one participant's use cases.
pub struct UiEventRouter {
    app: Arc<App>,
}

impl UiEventRouter {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    /// Handle one raw event. Only entity resolution failures are errors.
    pub async fn handle(&self, event: ClientEvent) -> Result<UiOutcome, IdentificationError> {
        match UiCommand::try_from(event) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping UI event");
                Ok(UiOutcome::Ignored)
            }
        }
    }

    pub async fn dispatch(&self, command: UiCommand) -> Result<UiOutcome, IdentificationError> {
        let identification = &self.app.use_cases.identification;
        match command {
            UiCommand::Reveal(request) => identification
                .reveal
                .request_reveal(request)
                .await
                .map(UiOutcome::Reveal),
            UiCommand::SubmitSettings { item, setting } => identification
                .settings
                .submit(item, setting)
                .await
                .map(UiOutcome::Settings),
            UiCommand::ToggleIdentifiable(item) => identification
                .settings
                .toggle_identifiable(item)
                .await
                .map(UiOutcome::Settings),
            UiCommand::ResetIdentifiable(item) => identification
                .settings
                .reset(item)
                .await
                .map(UiOutcome::Settings),
            UiCommand::PrintAbilities(actor_id) => identification
                .print
                .execute(actor_id)
                .await
                .map(UiOutcome::Printed),
        }
    }
}
