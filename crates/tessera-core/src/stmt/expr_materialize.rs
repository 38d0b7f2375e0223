use super::{Expr, SourceId};
use crate::schema::EntityId;

/// The materialization call site for a query source: the point where a
/// raw row becomes a tracked entity instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprMaterialize {
    pub source: SourceId,
    pub entity: EntityId,
}

impl From<ExprMaterialize> for Expr {
    fn from(value: ExprMaterialize) -> Self {
        Self::Materialize(value)
    }
}
