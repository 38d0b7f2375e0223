use super::EntityId;
use crate::stmt;

use std::fmt;

/// One scalar property of an entity type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Property {
    /// Uniquely identifies the property in the schema.
    pub id: PropertyId,

    /// The property's name on the entity type.
    pub name: String,

    /// The name of the backing column.
    pub column: String,

    /// The property's value type.
    pub ty: stmt::Type,

    /// Whether the column is nullable.
    pub nullable: bool,

    /// Default value applied by the store, if any.
    pub default_value: Option<stmt::Value>,

    /// Default SQL fragment applied by the store, if any. Mutually
    /// exclusive with `default_value`.
    pub default_sql: Option<String>,
}

/// Uniquely identifies a property; `index` is the storage ordinal.
#[derive(PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct PropertyId {
    pub entity: EntityId,
    pub index: usize,
}

impl Property {
    /// True when this property differs from `other` in a way that requires
    /// an ALTER of the backing column (name changes are renames, not
    /// alters).
    pub fn requires_alter(&self, other: &Property) -> bool {
        self.ty != other.ty
            || self.nullable != other.nullable
            || self.default_value != other.default_value
            || self.default_sql != other.default_sql
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "PropertyId({}/{})", self.entity.0, self.index)
    }
}

impl From<&Property> for PropertyId {
    fn from(value: &Property) -> Self {
        value.id
    }
}
