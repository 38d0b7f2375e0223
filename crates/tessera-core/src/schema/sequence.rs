use crate::stmt;

/// A database sequence.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sequence {
    /// Name of the sequence.
    pub name: String,

    /// Database schema the sequence lives in, if any.
    pub schema: Option<String>,

    /// First value the sequence yields.
    pub start: i64,

    /// Step between generated values.
    pub increment: i64,

    /// Lower bound, if any.
    pub min: Option<i64>,

    /// Upper bound, if any.
    pub max: Option<i64>,

    /// The generated value type.
    pub ty: stmt::Type,
}

impl Sequence {
    /// True when `other` differs only in bounds or increment; such changes
    /// are expressible as an ALTER rather than drop-and-create.
    pub fn alterable_to(&self, other: &Sequence) -> bool {
        self.ty == other.ty && self.start == other.start
    }
}
