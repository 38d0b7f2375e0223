use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenameIndex {
    pub table: TableName,
    pub name: String,
    pub new_name: String,
}
