use super::{Expr, Type};

/// A caller-bound variable reference.
///
/// The name may be a dotted access path into the caller's environment
/// (`"cfg.min_age"`); synthetic environment frames use a `__` prefix on
/// the leading segment and are collapsed when parameter names are derived
/// from the path. The declared type makes the variable's static type
/// available without evaluating it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprVar {
    pub name: String,
    pub ty: Type,
}

impl ExprVar {
    /// Path segments with synthetic frames collapsed.
    pub fn display_segments(&self) -> impl Iterator<Item = &str> {
        self.name
            .split('.')
            .filter(|segment| !segment.starts_with("__"))
    }
}

impl From<ExprVar> for Expr {
    fn from(value: ExprVar) -> Self {
        Self::Var(value)
    }
}
