use super::Expr;

/// A deferred function. Bodies are evaluated per row at execution time;
/// compilation passes that evaluate eagerly must not descend into them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLambda {
    pub params: Vec<String>,
    pub body: Box<Expr>,
}

impl From<ExprLambda> for Expr {
    fn from(value: ExprLambda) -> Self {
        Self::Lambda(value)
    }
}
