//! Host entities Veilkeep reads and annotates.

mod actor;
mod item;

pub use actor::{Actor, Speaker};
pub use item::{ItemCategory, ItemFlags, ItemRef, OwnedItem};
