//! Veilkeep engine library.
//!
//! Hidden-information workflow for a shared tabletop session: which owned
//! items are identifiable, who may reveal them, and how the chat messages
//! listing them stay consistent across participants.
//!
//! ## Structure
//!
//! - `use_cases/` - Identification workflow (state, projection, reveal, chat sync)
//! - `infrastructure/` - Ports plus in-process adapters (actor store, chat log, session hub)
//! - `api/` - UI event entry point
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Sample actors and a wired two-participant session.
#[cfg(test)]
pub mod test_fixtures;

/// Multi-participant scenarios over a real session hub.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
