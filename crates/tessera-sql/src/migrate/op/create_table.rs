use super::{ColumnDef, ForeignKeyDef, KeyDef, TableName};

/// Create a table with its columns, primary key, and foreign keys.
///
/// Indexes and alternate keys are emitted as separate operations; foreign
/// keys participating in a creation cycle are pulled out by the sorter
/// and deferred to [`super::AddForeignKey`] operations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateTable {
    pub name: TableName,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<KeyDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
}
