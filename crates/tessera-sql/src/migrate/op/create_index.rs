use super::TableName;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateIndex {
    pub table: TableName,
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}
