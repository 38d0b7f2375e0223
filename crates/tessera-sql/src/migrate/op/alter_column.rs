use super::{ColumnDef, TableName};

/// Alter a column to a new definition.
///
/// `destructive` is advisory, never blocking: it flags changes that can
/// lose data (dropping nullability, narrowing the type) so a caller can
/// require confirmation before running the script.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlterColumn {
    pub table: TableName,
    pub column: ColumnDef,
    pub destructive: bool,
}
