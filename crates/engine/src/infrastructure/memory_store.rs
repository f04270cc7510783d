//! In-memory actor store.
//!
//! Holds the canonical actors of a session. Each item's attribute bag lives
//! on the item itself, so flag writes are visible to the next read.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use veilkeep_domain::{Actor, ActorId, ItemRef, OwnedItem};

use super::ports::{ActorRepo, RepoError};

#[derive(Default)]
pub struct InMemoryActorRepo {
    actors: DashMap<ActorId, Actor>,
}

impl InMemoryActorRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actors(actors: impl IntoIterator<Item = Actor>) -> Self {
        let repo = Self::new();
        for actor in actors {
            repo.insert(actor);
        }
        repo
    }

    /// Load actors from a JSON array, as written by a world export.
    pub fn from_json(json: &str) -> Result<Self, RepoError> {
        let actors: Vec<Actor> =
            serde_json::from_str(json).map_err(RepoError::serialization)?;
        Ok(Self::with_actors(actors))
    }

    pub fn insert(&self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    fn with_item_mut<T>(
        &self,
        item: ItemRef,
        f: impl FnOnce(&mut OwnedItem) -> T,
    ) -> Result<T, RepoError> {
        let mut actor = self
            .actors
            .get_mut(&item.actor_id)
            .ok_or_else(|| RepoError::not_found("Actor", item.actor_id))?;
        let owned = actor
            .item_mut(item.item_id)
            .ok_or_else(|| RepoError::not_found("Item", item))?;
        Ok(f(owned))
    }
}

#[async_trait]
impl ActorRepo for InMemoryActorRepo {
    async fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        Ok(self.actors.get(&id).map(|actor| actor.clone()))
    }

    async fn get_item(&self, item: ItemRef) -> Result<Option<OwnedItem>, RepoError> {
        let actor = self
            .actors
            .get(&item.actor_id)
            .ok_or_else(|| RepoError::not_found("Actor", item.actor_id))?;
        Ok(actor.item(item.item_id).cloned())
    }

    async fn set_flag(
        &self,
        item: ItemRef,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), RepoError> {
        self.with_item_mut(item, |owned| owned.flags.set(namespace, key, value))
    }

    async fn unset_flag(
        &self,
        item: ItemRef,
        namespace: &str,
        key: &str,
    ) -> Result<(), RepoError> {
        self.with_item_mut(item, |owned| {
            owned.flags.unset(namespace, key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veilkeep_domain::ItemId;

    #[tokio::test]
    async fn flag_writes_are_visible_on_next_read() {
        let item = OwnedItem::new("Wand", "equipment");
        let actor = Actor::new("Hero").with_item(item.clone());
        let target = ItemRef::new(actor.id, item.id);
        let repo = InMemoryActorRepo::with_actors([actor]);

        repo.set_flag(target, "veilkeep", "identifiability", json!({"isIdentifiable": true}))
            .await
            .unwrap();
        let stored = repo.get_item(target).await.unwrap().unwrap();
        assert_eq!(
            stored.flags.get("veilkeep", "identifiability"),
            Some(&json!({"isIdentifiable": true}))
        );

        repo.unset_flag(target, "veilkeep", "identifiability")
            .await
            .unwrap();
        let cleared = repo.get_item(target).await.unwrap().unwrap();
        assert!(cleared.flags.is_empty());
    }

    #[tokio::test]
    async fn loads_actors_from_json() {
        let actor = Actor::new("Hero").with_item(OwnedItem::new("Wand", "equipment"));
        let json = serde_json::to_string(&vec![actor.clone()]).unwrap();
        let repo = InMemoryActorRepo::from_json(&json).unwrap();
        assert_eq!(repo.get_actor(actor.id).await.unwrap(), Some(actor));
        assert!(InMemoryActorRepo::from_json("{").is_err());
    }

    #[tokio::test]
    async fn when_actor_missing_returns_not_found() {
        let repo = InMemoryActorRepo::new();
        let err = repo
            .get_item(ItemRef::new(ActorId::new(), ItemId::new()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_item_on_known_actor_is_none() {
        let actor = Actor::new("Hero");
        let actor_id = actor.id;
        let repo = InMemoryActorRepo::with_actors([actor]);
        assert!(repo
            .get_item(ItemRef::new(actor_id, ItemId::new()))
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .set_flag(ItemRef::new(actor_id, ItemId::new()), "veilkeep", "x", Value::Null)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
