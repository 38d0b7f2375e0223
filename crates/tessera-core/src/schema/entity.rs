use super::{ForeignKey, Index, Key, Navigation, Property, PropertyId};

use std::fmt;

/// One entity type in the metadata model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityType {
    /// Uniquely identifies the entity within the schema.
    pub id: EntityId,

    /// Name of the entity type.
    pub name: String,

    /// Name of the backing table.
    pub table: String,

    /// Database schema the table lives in, if any.
    pub schema: Option<String>,

    /// Properties, in storage ordinal order.
    pub properties: Vec<Property>,

    /// Keys; index 0 is the primary key.
    pub keys: Vec<Key>,

    /// Foreign keys declared on this (dependent) entity.
    pub foreign_keys: Vec<ForeignKey>,

    /// Navigations declared on this entity.
    pub navigations: Vec<Navigation>,

    /// Indexes over this entity's properties.
    pub indexes: Vec<Index>,
}

/// Uniquely identifies an entity type.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct EntityId(pub usize);

impl EntityType {
    pub fn property(&self, id: impl Into<PropertyId>) -> &Property {
        &self.properties[id.into().index]
    }

    pub fn property_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn primary_key(&self) -> &Key {
        &self.keys[0]
    }

    pub fn primary_key_properties(&self) -> impl ExactSizeIterator<Item = &Property> + '_ {
        self.primary_key()
            .properties
            .iter()
            .map(|id| &self.properties[id.index])
    }

    pub fn navigation_by_name(&self, name: &str) -> Option<&Navigation> {
        self.navigations
            .iter()
            .find(|navigation| navigation.name == name)
    }

    /// The storage ordinal of a property: its position in the value buffer.
    pub fn ordinal(&self, id: impl Into<PropertyId>) -> usize {
        id.into().index
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EntityId({})", self.0)
    }
}

impl From<&EntityType> for EntityId {
    fn from(value: &EntityType) -> Self {
        value.id
    }
}
