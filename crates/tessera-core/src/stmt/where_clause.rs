use super::Expr;

/// A filter over the sources in scope.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub predicate: Expr,
}

impl WhereClause {
    pub fn new(predicate: impl Into<Expr>) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }
}
