use super::Expr;

/// Ternary conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCondition {
    pub test: Box<Expr>,
    pub when_true: Box<Expr>,
    pub when_false: Box<Expr>,
}

impl From<ExprCondition> for Expr {
    fn from(value: ExprCondition) -> Self {
        Self::Condition(value)
    }
}
