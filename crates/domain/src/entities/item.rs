//! Owned item entity - an ability, feature or piece of gear held by an actor
//!
//! Items are owned by the host runtime. Veilkeep never creates or destroys
//! them; it only reads their display payload and annotates their attribute
//! bag ([`ItemFlags`]) under its own namespace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::none_if_blank;
use crate::{ActorId, ItemId};

/// Category of an item as reported by the host game system.
///
/// Only the categories the legacy inference table distinguishes get their
/// own variant; everything else is preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemCategory {
    Spell,
    Weapon,
    Equipment,
    Feat,
    Other(String),
}

impl ItemCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Spell => "spell",
            Self::Weapon => "weapon",
            Self::Equipment => "equipment",
            Self::Feat => "feat",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ItemCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "spell" => Self::Spell,
            "weapon" => Self::Weapon,
            "equipment" => Self::Equipment,
            "feat" => Self::Feat,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ItemCategory {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ItemCategory> for String {
    fn from(value: ItemCategory) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Namespaced attribute bag attached to an item.
///
/// Values are arbitrary JSON because earlier versions of the store wrote
/// booleans, numbers and strings interchangeably.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemFlags(BTreeMap<String, BTreeMap<String, Value>>);

impl ItemFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.0.get(namespace).and_then(|scope| scope.get(key))
    }

    pub fn set(&mut self, namespace: &str, key: &str, value: Value) {
        self.0
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Removes a value. Returns true if something was removed.
    pub fn unset(&mut self, namespace: &str, key: &str) -> bool {
        let Some(scope) = self.0.get_mut(namespace) else {
            return false;
        };
        let removed = scope.remove(key).is_some();
        if scope.is_empty() {
            self.0.remove(namespace);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Identity pair that locates an item inside its owning actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub actor_id: ActorId,
    pub item_id: ItemId,
}

impl ItemRef {
    pub fn new(actor_id: ActorId, item_id: ItemId) -> Self {
        Self { actor_id, item_id }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.actor_id, self.item_id)
    }
}

/// Snapshot of an item as read from the host runtime.
///
/// This is a data-carrying struct with no invariants to protect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    pub id: ItemId,
    pub name: String,
    pub img: String,
    pub category: ItemCategory,
    /// HTML description (may be empty)
    #[serde(default)]
    pub description_html: String,
    /// Activation type (e.g. "action", "bonus"); empty or absent means passive
    #[serde(default)]
    pub activation_type: Option<String>,
    #[serde(default)]
    pub flags: ItemFlags,
}

impl OwnedItem {
    pub fn new(name: impl Into<String>, category: impl Into<ItemCategory>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            img: String::new(),
            category: category.into(),
            description_html: String::new(),
            activation_type: None,
            flags: ItemFlags::new(),
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    pub fn with_description(mut self, html: impl Into<String>) -> Self {
        self.description_html = html.into();
        self
    }

    pub fn with_activation(mut self, activation_type: impl Into<String>) -> Self {
        self.activation_type = Some(activation_type.into());
        self
    }

    pub fn with_flag(mut self, namespace: &str, key: &str, value: Value) -> Self {
        self.flags.set(namespace, key, value);
        self
    }

    /// True if the item declares a non-empty activation type.
    pub fn has_activation(&self) -> bool {
        self.activation_type
            .as_deref()
            .and_then(none_if_blank)
            .is_some()
    }
}
