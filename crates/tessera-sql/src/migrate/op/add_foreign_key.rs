use super::{ForeignKeyDef, TableName};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AddForeignKey {
    pub table: TableName,
    pub foreign_key: ForeignKeyDef,
}
