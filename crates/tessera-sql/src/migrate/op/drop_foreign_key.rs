use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropForeignKey {
    pub table: TableName,
    pub name: String,
}
