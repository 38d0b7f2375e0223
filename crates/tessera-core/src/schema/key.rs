use super::{EntityId, PropertyId};

use std::fmt;

/// A primary or alternate key over an ordered set of properties.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Key {
    pub id: KeyId,

    /// Constraint name, if one was configured.
    pub name: Option<String>,

    /// Key properties, order-sensitive.
    pub properties: Vec<PropertyId>,

    /// True for the entity's primary key.
    pub primary: bool,
}

/// Uniquely identifies a key on an entity.
#[derive(PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyId {
    pub entity: EntityId,
    pub index: usize,
}

impl fmt::Debug for KeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "KeyId({}/{})", self.entity.0, self.index)
    }
}
