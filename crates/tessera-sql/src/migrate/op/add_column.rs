use super::{ColumnDef, TableName};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AddColumn {
    pub table: TableName,
    pub column: ColumnDef,
}
