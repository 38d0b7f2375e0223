use super::{EntityId, ForeignKeyId};

use std::fmt;

/// A typed reference from one entity to a related entity or collection,
/// backed by a foreign key.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Navigation {
    pub id: NavigationId,

    /// The navigation's name on the declaring entity.
    pub name: String,

    /// The backing foreign key.
    pub foreign_key: ForeignKeyId,

    /// True when declared on the foreign key's dependent entity (a to-one
    /// reference toward the principal); false when declared on the
    /// principal (pointing back at dependents).
    pub on_dependent: bool,

    /// True for collection navigations (one principal, many dependents).
    pub to_many: bool,
}

/// Uniquely identifies a navigation on its declaring entity.
#[derive(PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub struct NavigationId {
    pub entity: EntityId,
    pub index: usize,
}

impl fmt::Debug for NavigationId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "NavigationId({}/{})", self.entity.0, self.index)
    }
}
