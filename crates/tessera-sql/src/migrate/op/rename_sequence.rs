use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenameSequence {
    pub name: TableName,
    pub new_name: String,
}
