use super::{KeyDef, TableName};

/// Add a primary-key or unique constraint to an existing table.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AddKey {
    pub table: TableName,
    pub key: KeyDef,
}
