use super::{EntityId, KeyId, PropertyId};

use std::fmt;

/// A foreign key from a dependent entity to a principal key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKey {
    pub id: ForeignKeyId,

    /// Constraint name, if one was configured.
    pub name: Option<String>,

    /// Dependent-side properties, order-matched to the principal key.
    pub properties: Vec<PropertyId>,

    /// The entity the foreign key points at.
    pub principal_entity: EntityId,

    /// The principal key the dependent properties reference.
    pub principal_key: KeyId,

    /// What the store does to dependents when the principal is deleted.
    pub on_delete: DeleteBehavior,
}

/// Uniquely identifies a foreign key on its dependent entity.
#[derive(PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyId {
    pub entity: EntityId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeleteBehavior {
    Cascade,
    Restrict,
    SetNull,
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({}/{})", self.entity.0, self.index)
    }
}
