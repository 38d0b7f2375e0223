use super::{Expr, SourceId};

/// A `from` clause: binds a range variable over the sequence its
/// expression evaluates to.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// The range variable this clause produces.
    pub source: SourceId,

    /// Display name of the range variable.
    pub name: String,

    /// The sequence being enumerated: an entity root, a sub-query, or
    /// (before navigation rewriting) a member access over another source.
    pub expr: Expr,
}

impl FromClause {
    pub fn new(source: SourceId, name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            source,
            name: name.into(),
            expr: expr.into(),
        }
    }
}
