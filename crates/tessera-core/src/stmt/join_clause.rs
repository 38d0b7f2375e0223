use super::{Expr, SourceId};

/// A join clause: binds a range variable over `inner`, correlated by key
/// equality with the enclosing clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// The range variable this clause produces.
    pub source: SourceId,

    /// Display name of the range variable.
    pub name: String,

    /// The joined sequence.
    pub inner: Expr,

    /// Key selector over the outer sources.
    pub outer_key: Expr,

    /// Key selector over this clause's own range variable.
    pub inner_key: Expr,
}

/// A group-join clause: a join whose matches are exposed as a grouped
/// sequence bound to a second range variable.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupJoinClause {
    /// The grouped range variable.
    pub source: SourceId,

    /// Display name of the grouped range variable.
    pub name: String,

    pub join: JoinClause,
}
