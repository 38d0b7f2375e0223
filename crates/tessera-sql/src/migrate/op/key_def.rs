use super::TableName;
use tessera_core::schema::DeleteBehavior;

/// A primary-key or unique constraint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyDef {
    pub name: String,
    pub columns: Vec<String>,
    pub primary: bool,
}

/// A foreign-key constraint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyDef {
    pub name: String,
    pub columns: Vec<String>,
    pub principal_table: TableName,
    pub principal_columns: Vec<String>,
    pub on_delete: DeleteBehavior,
}
