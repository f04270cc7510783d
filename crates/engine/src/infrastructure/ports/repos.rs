//! Entity/inventory port.

use async_trait::async_trait;
use serde_json::Value;
use veilkeep_domain::{Actor, ActorId, ItemRef, OwnedItem};

use super::error::RepoError;

/// Access to the host runtime's actors, their items and the per-item
/// attribute bag.
///
/// Items are returned with their attribute bag attached, so reading a flag
/// is a plain lookup on the snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
    async fn get_item(&self, item: ItemRef) -> Result<Option<OwnedItem>, RepoError>;

    // Attribute bag
    async fn set_flag(
        &self,
        item: ItemRef,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError>;
    async fn unset_flag(&self, item: ItemRef, namespace: &str, key: &str)
        -> Result<(), RepoError>;
}
