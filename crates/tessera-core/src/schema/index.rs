use super::{EntityId, PropertyId};

use std::fmt;

/// An index over an entity's properties.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Index {
    pub id: IndexId,

    /// Name of the index in the database.
    pub name: String,

    /// Indexed properties, order-sensitive.
    pub properties: Vec<PropertyId>,

    /// True when the index enforces uniqueness.
    pub unique: bool,
}

/// Uniquely identifies an index on an entity.
#[derive(PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct IndexId {
    pub entity: EntityId,
    pub index: usize,
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({}/{})", self.entity.0, self.index)
    }
}
