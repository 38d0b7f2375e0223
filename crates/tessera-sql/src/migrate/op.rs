//! Schema-change operations emitted by the differ.
//!
//! Each operation is immutable once emitted; the sorter reorders and, for
//! cyclic foreign keys, splits them, but never mutates one in place.

mod add_column;
pub use add_column::AddColumn;

mod add_foreign_key;
pub use add_foreign_key::AddForeignKey;

mod add_key;
pub use add_key::AddKey;

mod alter_column;
pub use alter_column::AlterColumn;

mod alter_sequence;
pub use alter_sequence::AlterSequence;

mod column_def;
pub use column_def::ColumnDef;

mod create_index;
pub use create_index::CreateIndex;

mod create_sequence;
pub use create_sequence::CreateSequence;

mod create_table;
pub use create_table::CreateTable;

mod drop_column;
pub use drop_column::DropColumn;

mod drop_foreign_key;
pub use drop_foreign_key::DropForeignKey;

mod drop_index;
pub use drop_index::DropIndex;

mod drop_key;
pub use drop_key::DropKey;

mod drop_sequence;
pub use drop_sequence::DropSequence;

mod drop_table;
pub use drop_table::DropTable;

mod ensure_schema;
pub use ensure_schema::EnsureSchema;

mod key_def;
pub use key_def::{ForeignKeyDef, KeyDef};

mod name;
pub use name::TableName;

mod rename_column;
pub use rename_column::RenameColumn;

mod rename_index;
pub use rename_index::RenameIndex;

mod rename_sequence;
pub use rename_sequence::RenameSequence;

mod rename_table;
pub use rename_table::RenameTable;

/// One schema-change operation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MigrationOperation {
    CreateTable(CreateTable),
    DropTable(DropTable),
    RenameTable(RenameTable),
    AddColumn(AddColumn),
    DropColumn(DropColumn),
    AlterColumn(AlterColumn),
    RenameColumn(RenameColumn),
    AddKey(AddKey),
    DropKey(DropKey),
    AddForeignKey(AddForeignKey),
    DropForeignKey(DropForeignKey),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    RenameIndex(RenameIndex),
    CreateSequence(CreateSequence),
    DropSequence(DropSequence),
    AlterSequence(AlterSequence),
    RenameSequence(RenameSequence),
    EnsureSchema(EnsureSchema),
}

macro_rules! op_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for MigrationOperation {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

op_from!(
    CreateTable,
    DropTable,
    RenameTable,
    AddColumn,
    DropColumn,
    AlterColumn,
    RenameColumn,
    AddKey,
    DropKey,
    AddForeignKey,
    DropForeignKey,
    CreateIndex,
    DropIndex,
    RenameIndex,
    CreateSequence,
    DropSequence,
    AlterSequence,
    RenameSequence,
    EnsureSchema,
);
