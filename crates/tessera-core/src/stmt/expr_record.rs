use super::Expr;

/// Evaluates to an order-sensitive composite value: constructed objects
/// in comparisons, and composite key selectors synthesized by the
/// navigation rewriter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprRecord {
    pub fields: Vec<Expr>,
}

impl ExprRecord {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<ExprRecord> for Expr {
    fn from(value: ExprRecord) -> Self {
        Self::Record(value)
    }
}
