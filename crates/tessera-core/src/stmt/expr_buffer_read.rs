use super::{Expr, Type};

/// An indexed read from the current value buffer, standing in for member
/// access once a source is known to project a raw row rather than a
/// materialized entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBufferRead {
    pub ordinal: usize,
    pub ty: Type,
}

impl From<ExprBufferRead> for Expr {
    fn from(value: ExprBufferRead) -> Self {
        Self::BufferRead(value)
    }
}
