/// A batch of raw SQL statements executed in order on one connection.
/// Rows returned by the final statement, if any, come back in the
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlBatch {
    pub statements: Vec<String>,
}

impl SqlBatch {
    pub fn one(statement: impl Into<String>) -> Self {
        Self {
            statements: vec![statement.into()],
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SqlBatch {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            statements: iter.into_iter().map(Into::into).collect(),
        }
    }
}
