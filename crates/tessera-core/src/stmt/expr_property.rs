use super::{Expr, SourceId};
use crate::schema::PropertyId;

/// Resolved access to one property of a query source's range variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprProperty {
    pub source: SourceId,
    pub property: PropertyId,
}

impl From<ExprProperty> for Expr {
    fn from(value: ExprProperty) -> Self {
        Self::Property(value)
    }
}
