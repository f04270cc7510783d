//! Entry points from the host UI.

pub mod ui_events;

pub use ui_events::{UiCommand, UiEventError, UiEventRouter, UiOutcome};
