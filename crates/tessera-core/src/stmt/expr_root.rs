use super::Expr;
use crate::schema::EntityId;

/// The full enumeration of an entity's store. From clauses originate
/// here before any rewriting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprRoot {
    pub entity: EntityId,
}

impl From<ExprRoot> for Expr {
    fn from(value: ExprRoot) -> Self {
        Self::Root(value)
    }
}
