//! Infrastructure implementations.
//!
//! Contains port trait implementations for the session's collaborators.

pub mod chat_log;
pub mod config;
pub mod memory_store;
pub mod ports;
pub mod request_ledger;
pub mod session_hub;
pub mod templates;
