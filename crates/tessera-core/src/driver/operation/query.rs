/// A rendered provider-native query: a table name, an optional filter in
/// the provider's grammar, and an optional row limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub table: String,
    pub filter: Option<String>,
    pub take: Option<i64>,
}
