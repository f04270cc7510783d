//! Actor entity - a game entity that owns items

use serde::{Deserialize, Serialize};

use crate::{ActorId, ItemId, OwnedItem};

/// An actor and its inventory, as read from the host runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<OwnedItem>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ActorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_item(mut self, item: OwnedItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn item(&self, item_id: ItemId) -> Option<&OwnedItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: ItemId) -> Option<&mut OwnedItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Speaker reference for chat artifacts posted on behalf of this actor.
    pub fn speaker(&self) -> Speaker {
        Speaker {
            actor_id: Some(self.id),
            alias: self.name.clone(),
        }
    }
}

/// Who a chat artifact is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub actor_id: Option<ActorId>,
    pub alias: String,
}
