use super::Expr;

/// Member access by name, not yet resolved against the metadata model.
///
/// The navigation rewriter consumes members that name navigations; the
/// member binder resolves what remains into [`super::ExprProperty`] or
/// buffer reads. A member surviving to the provider backends is a
/// translation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMember {
    pub base: Box<Expr>,
    pub name: String,
}

impl From<ExprMember> for Expr {
    fn from(value: ExprMember) -> Self {
        Self::Member(value)
    }
}
