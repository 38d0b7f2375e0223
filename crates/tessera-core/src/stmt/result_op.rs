use super::Expr;

/// A result operator applied after the select clause, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultOperator {
    /// Limit the result to the first N rows; the count may be a constant
    /// or an extracted parameter.
    Take(Expr),

    /// Skip the first N rows.
    Skip(Expr),

    /// Return the first row; `or_default` yields null instead of erroring
    /// on an empty result.
    First { or_default: bool },

    /// Count the rows.
    Count,

    /// True when any row exists.
    Any,

    /// Drop duplicate rows.
    Distinct,
}
