use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropIndex {
    pub table: TableName,
    pub name: String,
}
