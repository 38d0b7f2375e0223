use super::{Expr, Query};

/// A nested query model evaluated as an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSubquery {
    pub query: Box<Query>,
}

impl From<ExprSubquery> for Expr {
    fn from(value: ExprSubquery) -> Self {
        Self::Subquery(value)
    }
}
