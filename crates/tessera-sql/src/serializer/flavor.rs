/// The SQL dialects the serializer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
}

impl Flavor {
    pub fn is_postgresql(self) -> bool {
        matches!(self, Self::Postgresql)
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    /// Separator appended after each statement of a script.
    pub fn batch_terminator(self) -> &'static str {
        ";\n"
    }
}
