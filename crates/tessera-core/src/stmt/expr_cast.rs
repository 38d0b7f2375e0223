use super::{Expr, Type};

/// Convert an expression's value to a different type.
///
/// Numeric widening introduced by the navigation rewriter uses this node;
/// a cast to the expression's own type is a no-op wrapper and is treated
/// as transparent by the filter factory.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCast {
    pub expr: Box<Expr>,
    pub ty: Type,
}

impl From<ExprCast> for Expr {
    fn from(value: ExprCast) -> Self {
        Self::Cast(value)
    }
}
