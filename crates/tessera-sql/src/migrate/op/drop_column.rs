use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropColumn {
    pub table: TableName,
    pub name: String,
}
