use super::Expr;

/// Placeholder for a value extracted during compilation and registered on
/// the query context under a generated, compilation-unique name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprParam {
    pub name: String,
}

impl From<ExprParam> for Expr {
    fn from(value: ExprParam) -> Self {
        Self::Param(value)
    }
}
