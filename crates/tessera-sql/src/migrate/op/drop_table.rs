use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropTable {
    pub name: TableName,
}
