use super::TableName;

/// Retune a sequence's increment and bounds. Start and type changes are
/// not alterable and diff as drop-and-create instead.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlterSequence {
    pub name: TableName,
    pub increment: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
}
