use super::Expr;

/// A named call. Query-directive methods (include, change-tracking
/// toggles) appear as calls until the annotation pass lifts them into
/// structured [`super::QueryAnnotation`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub method: String,
    pub args: Vec<Expr>,
}

impl From<ExprCall> for Expr {
    fn from(value: ExprCall) -> Self {
        Self::Call(value)
    }
}
