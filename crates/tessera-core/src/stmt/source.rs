use std::fmt;

/// Opaque identity of one range variable within a query model.
///
/// Clause and expression nodes refer to their range variable through this
/// token rather than by position, so clauses can be inserted and reordered
/// by the rewrite passes without invalidating references.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// Allocates fresh [`SourceId`]s for one compilation.
///
/// One generator per compilation: identity is unique within a query model
/// and its sub-queries, never across compilations.
#[derive(Debug, Default)]
pub struct SourceGen {
    next: u32,
}

impl SourceGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose ids start after every id already present in a
    /// caller-built query model.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> SourceId {
        let id = SourceId(self.next);
        self.next += 1;
        id
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "SourceId({})", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "s{}", self.0)
    }
}
