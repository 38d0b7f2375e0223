use super::{Expr, SourceId};

/// References the range variable bound by a from/join clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprSourceRef {
    pub source: SourceId,
}

impl From<ExprSourceRef> for Expr {
    fn from(value: ExprSourceRef) -> Self {
        Self::SourceRef(value)
    }
}
