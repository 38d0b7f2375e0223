use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenameTable {
    pub name: TableName,
    pub new_name: String,
}
