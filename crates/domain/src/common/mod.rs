//! Common utility functions shared across Veilkeep crates.
//!
//! Pure functions only - no side effects, no I/O.

pub mod string;

pub use string::{compare_display_names, name_sort_key, none_if_blank};
