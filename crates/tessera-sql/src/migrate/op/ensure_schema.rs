/// Create a database schema when it does not already exist; ordered
/// ahead of every create operation that may land inside it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnsureSchema {
    pub name: String,
}
