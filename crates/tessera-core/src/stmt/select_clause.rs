use super::Expr;

/// The projection of a query model.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectClause {
    pub expr: Expr,
}

impl SelectClause {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self { expr: expr.into() }
    }
}
