mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::Ident;

mod ty;
mod value;

use crate::migrate::op::{
    AddColumn, AddForeignKey, AddKey, AlterColumn, AlterSequence, ColumnDef, CreateIndex,
    CreateSequence, CreateTable, DropColumn, DropForeignKey, DropIndex, DropKey, DropSequence,
    DropTable, EnsureSchema, ForeignKeyDef, KeyDef, MigrationOperation, RenameColumn, RenameIndex,
    RenameSequence, RenameTable, TableName,
};
use std::fmt::Write as _;
use tessera_core::{schema::DeleteBehavior, Error, Result};

/// Whether create/drop statements carry existence guards so a script can
/// be re-run safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardMode {
    #[default]
    Plain,
    Idempotent,
}

/// Renders migration operations to SQL for one database flavor.
#[derive(Debug, Clone)]
pub struct Serializer {
    flavor: Flavor,
    guards: GuardMode,
}

impl Serializer {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            guards: GuardMode::Plain,
        }
    }

    pub fn idempotent(flavor: Flavor) -> Self {
        Self {
            flavor,
            guards: GuardMode::Idempotent,
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Serialize an ordered operation list to one statement per
    /// operation, in order.
    pub fn serialize_batch(&self, operations: &[MigrationOperation]) -> Result<Vec<String>> {
        operations
            .iter()
            .map(|operation| self.serialize_operation(operation))
            .collect()
    }

    /// Render a batch as one script, statements separated by the
    /// flavor's batch terminator.
    pub fn script(&self, operations: &[MigrationOperation]) -> Result<String> {
        let statements = self.serialize_batch(operations)?;
        let terminator = self.flavor.batch_terminator();

        let mut script = String::new();
        for statement in statements {
            script.push_str(&statement);
            script.push_str(terminator);
        }
        Ok(script)
    }

    pub fn serialize_operation(&self, operation: &MigrationOperation) -> Result<String> {
        use MigrationOperation::*;

        match operation {
            CreateTable(op) => self.create_table(op),
            DropTable(op) => self.drop_table(op),
            RenameTable(op) => self.rename_table(op),
            AddColumn(op) => self.add_column(op),
            DropColumn(op) => self.drop_column(op),
            AlterColumn(op) => self.alter_column(op),
            RenameColumn(op) => self.rename_column(op),
            AddKey(op) => self.add_key(op),
            DropKey(op) => self.drop_constraint(&op.table, &op.name),
            AddForeignKey(op) => self.add_foreign_key(op),
            DropForeignKey(op) => self.drop_constraint(&op.table, &op.name),
            CreateIndex(op) => self.create_index(op),
            DropIndex(op) => self.drop_index(op),
            RenameIndex(op) => self.rename_index(op),
            CreateSequence(op) => self.create_sequence(op),
            DropSequence(op) => self.drop_sequence(op),
            AlterSequence(op) => self.alter_sequence(op),
            RenameSequence(op) => self.rename_sequence(op),
            EnsureSchema(op) => self.ensure_schema(op),
        }
    }

    fn idempotent_guards(&self) -> bool {
        self.guards == GuardMode::Idempotent
    }

    fn create_table(&self, op: &CreateTable) -> Result<String> {
        let mut sql = String::from("CREATE TABLE ");
        if self.idempotent_guards() {
            sql.push_str("IF NOT EXISTS ");
        }
        let _ = write!(sql, "{} (", self.table(&op.name));

        for (index, column) in op.columns.iter().enumerate() {
            if index > 0 {
                sql.push(',');
            }
            let _ = write!(sql, "\n    {}", self.column_def(column)?);
        }

        if let Some(key) = &op.primary_key {
            let _ = write!(sql, ",\n    {}", self.key_constraint(key));
        }

        for fk in &op.foreign_keys {
            let _ = write!(sql, ",\n    {}", self.foreign_key_constraint(fk));
        }

        sql.push_str("\n)");
        Ok(sql)
    }

    fn drop_table(&self, op: &DropTable) -> Result<String> {
        let guard = if self.idempotent_guards() {
            "IF EXISTS "
        } else {
            ""
        };
        Ok(format!("DROP TABLE {guard}{}", self.table(&op.name)))
    }

    fn rename_table(&self, op: &RenameTable) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME TO {}",
            self.table(&op.name),
            Ident(&op.new_name)
        ))
    }

    fn add_column(&self, op: &AddColumn) -> Result<String> {
        // Postgres guards ADD COLUMN; SQLite has no such form, so the
        // statement stays unguarded there even in idempotent mode.
        let guard = if self.idempotent_guards() && self.flavor.is_postgresql() {
            "IF NOT EXISTS "
        } else {
            ""
        };
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {guard}{}",
            self.table(&op.table),
            self.column_def(&op.column)?
        ))
    }

    fn drop_column(&self, op: &DropColumn) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.table(&op.table),
            Ident(&op.name)
        ))
    }

    fn alter_column(&self, op: &AlterColumn) -> Result<String> {
        if !self.flavor.is_postgresql() {
            return Err(Error::unsupported_feature(format!(
                "altering a column requires a table rebuild on {:?}",
                self.flavor
            )));
        }

        let table = self.table(&op.table);
        let column = Ident(&op.column.name);
        let ty = ty::sql_type(self.flavor, &op.column.ty)?;

        let mut sql = format!("ALTER TABLE {table} ALTER COLUMN {column} TYPE {ty}");

        if op.column.nullable {
            let _ = write!(sql, ", ALTER COLUMN {column} DROP NOT NULL");
        } else {
            let _ = write!(sql, ", ALTER COLUMN {column} SET NOT NULL");
        }

        match (&op.column.default_value, &op.column.default_sql) {
            (Some(default), _) => {
                let _ = write!(
                    sql,
                    ", ALTER COLUMN {column} SET DEFAULT {}",
                    value::literal(self.flavor, default)?
                );
            }
            (None, Some(default_sql)) => {
                let _ = write!(sql, ", ALTER COLUMN {column} SET DEFAULT {default_sql}");
            }
            (None, None) => {
                let _ = write!(sql, ", ALTER COLUMN {column} DROP DEFAULT");
            }
        }

        Ok(sql)
    }

    fn rename_column(&self, op: &RenameColumn) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.table(&op.table),
            Ident(&op.name),
            Ident(&op.new_name)
        ))
    }

    fn add_key(&self, op: &AddKey) -> Result<String> {
        self.require_constraint_support("adding a key constraint")?;
        Ok(format!(
            "ALTER TABLE {} ADD {}",
            self.table(&op.table),
            self.key_constraint(&op.key)
        ))
    }

    fn add_foreign_key(&self, op: &AddForeignKey) -> Result<String> {
        self.require_constraint_support("adding a foreign key")?;
        Ok(format!(
            "ALTER TABLE {} ADD {}",
            self.table(&op.table),
            self.foreign_key_constraint(&op.foreign_key)
        ))
    }

    fn drop_constraint(&self, table: &TableName, name: &str) -> Result<String> {
        self.require_constraint_support("dropping a constraint")?;
        let guard = if self.idempotent_guards() {
            "IF EXISTS "
        } else {
            ""
        };
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT {guard}{}",
            self.table(table),
            Ident(name)
        ))
    }

    fn create_index(&self, op: &CreateIndex) -> Result<String> {
        let unique = if op.unique { "UNIQUE " } else { "" };
        let guard = if self.idempotent_guards() {
            "IF NOT EXISTS "
        } else {
            ""
        };
        Ok(format!(
            "CREATE {unique}INDEX {guard}{} ON {} ({})",
            Ident(&op.name),
            self.table(&op.table),
            comma_idents(&op.columns)
        ))
    }

    fn drop_index(&self, op: &DropIndex) -> Result<String> {
        let guard = if self.idempotent_guards() {
            "IF EXISTS "
        } else {
            ""
        };
        Ok(format!("DROP INDEX {guard}{}", Ident(&op.name)))
    }

    fn rename_index(&self, op: &RenameIndex) -> Result<String> {
        if !self.flavor.is_postgresql() {
            return Err(Error::unsupported_feature(format!(
                "renaming an index is not supported on {:?}",
                self.flavor
            )));
        }
        Ok(format!(
            "ALTER INDEX {} RENAME TO {}",
            Ident(&op.name),
            Ident(&op.new_name)
        ))
    }

    fn create_sequence(&self, op: &CreateSequence) -> Result<String> {
        self.require_sequence_support()?;

        let mut sql = String::from("CREATE SEQUENCE ");
        if self.idempotent_guards() {
            sql.push_str("IF NOT EXISTS ");
        }
        let _ = write!(
            sql,
            "{} AS {} START WITH {} INCREMENT BY {}",
            self.table(&op.name),
            ty::sql_type(self.flavor, &op.ty)?,
            op.start,
            op.increment
        );

        match op.min {
            Some(min) => {
                let _ = write!(sql, " MINVALUE {min}");
            }
            None => sql.push_str(" NO MINVALUE"),
        }
        match op.max {
            Some(max) => {
                let _ = write!(sql, " MAXVALUE {max}");
            }
            None => sql.push_str(" NO MAXVALUE"),
        }

        Ok(sql)
    }

    fn drop_sequence(&self, op: &DropSequence) -> Result<String> {
        self.require_sequence_support()?;
        let guard = if self.idempotent_guards() {
            "IF EXISTS "
        } else {
            ""
        };
        Ok(format!("DROP SEQUENCE {guard}{}", self.table(&op.name)))
    }

    fn alter_sequence(&self, op: &AlterSequence) -> Result<String> {
        self.require_sequence_support()?;

        let mut sql = format!(
            "ALTER SEQUENCE {} INCREMENT BY {}",
            self.table(&op.name),
            op.increment
        );
        match op.min {
            Some(min) => {
                let _ = write!(sql, " MINVALUE {min}");
            }
            None => sql.push_str(" NO MINVALUE"),
        }
        match op.max {
            Some(max) => {
                let _ = write!(sql, " MAXVALUE {max}");
            }
            None => sql.push_str(" NO MAXVALUE"),
        }
        Ok(sql)
    }

    fn rename_sequence(&self, op: &RenameSequence) -> Result<String> {
        self.require_sequence_support()?;
        Ok(format!(
            "ALTER SEQUENCE {} RENAME TO {}",
            self.table(&op.name),
            Ident(&op.new_name)
        ))
    }

    fn ensure_schema(&self, op: &EnsureSchema) -> Result<String> {
        if !self.flavor.is_postgresql() {
            return Err(Error::unsupported_feature(format!(
                "schemas are not supported on {:?}",
                self.flavor
            )));
        }
        Ok(format!("CREATE SCHEMA IF NOT EXISTS {}", Ident(&op.name)))
    }

    fn column_def(&self, column: &ColumnDef) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            Ident(&column.name),
            ty::sql_type(self.flavor, &column.ty)?
        );

        if !column.nullable {
            sql.push_str(" NOT NULL");
        }

        match (&column.default_value, &column.default_sql) {
            (Some(default), _) => {
                let _ = write!(sql, " DEFAULT {}", value::literal(self.flavor, default)?);
            }
            (None, Some(default_sql)) => {
                let _ = write!(sql, " DEFAULT {default_sql}");
            }
            (None, None) => {}
        }

        Ok(sql)
    }

    fn key_constraint(&self, key: &KeyDef) -> String {
        let kind = if key.primary { "PRIMARY KEY" } else { "UNIQUE" };
        format!(
            "CONSTRAINT {} {kind} ({})",
            Ident(&key.name),
            comma_idents(&key.columns)
        )
    }

    fn foreign_key_constraint(&self, fk: &ForeignKeyDef) -> String {
        let on_delete = match fk.on_delete {
            DeleteBehavior::Cascade => "CASCADE",
            DeleteBehavior::Restrict => "RESTRICT",
            DeleteBehavior::SetNull => "SET NULL",
        };

        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {on_delete}",
            Ident(&fk.name),
            comma_idents(&fk.columns),
            self.table(&fk.principal_table),
            comma_idents(&fk.principal_columns)
        )
    }

    fn table(&self, name: &TableName) -> String {
        match &name.schema {
            Some(schema) => format!("{}.{}", Ident(schema), Ident(&name.name)),
            None => Ident(&name.name).to_string(),
        }
    }

    fn require_constraint_support(&self, action: &str) -> Result<()> {
        if self.flavor.is_postgresql() {
            Ok(())
        } else {
            Err(Error::unsupported_feature(format!(
                "{action} requires a table rebuild on {:?}",
                self.flavor
            )))
        }
    }

    fn require_sequence_support(&self) -> Result<()> {
        if self.flavor.is_postgresql() {
            Ok(())
        } else {
            Err(Error::unsupported_feature(format!(
                "sequences are not supported on {:?}",
                self.flavor
            )))
        }
    }
}

fn comma_idents(names: &[String]) -> String {
    names
        .iter()
        .map(|name| Ident(name).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_core::stmt::Type;

    fn nullable_column(name: &str, ty: Type) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            ty,
            nullable: true,
            default_value: None,
            default_sql: None,
        }
    }

    #[test]
    fn create_table_renders_columns_and_constraints() {
        let serializer = Serializer::new(Flavor::Postgresql);
        let op = CreateTable {
            name: "Person".into(),
            columns: vec![
                ColumnDef {
                    name: "Id".to_string(),
                    ty: Type::I64,
                    nullable: false,
                    default_value: None,
                    default_sql: None,
                },
                nullable_column("Email", Type::String),
            ],
            primary_key: Some(KeyDef {
                name: "PK_Person".to_string(),
                columns: vec!["Id".to_string()],
                primary: true,
            }),
            foreign_keys: vec![],
        };

        let sql = serializer.serialize_operation(&op.into()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"Person\" (\n    \"Id\" BIGINT NOT NULL,\n    \"Email\" TEXT,\n    CONSTRAINT \"PK_Person\" PRIMARY KEY (\"Id\")\n)"
        );
    }

    #[test]
    fn idempotent_mode_guards_creates_and_drops() {
        let serializer = Serializer::idempotent(Flavor::Postgresql);

        let create = serializer
            .serialize_operation(
                &CreateTable {
                    name: "T".into(),
                    columns: vec![nullable_column("A", Type::I32)],
                    primary_key: None,
                    foreign_keys: vec![],
                }
                .into(),
            )
            .unwrap();
        assert!(create.starts_with("CREATE TABLE IF NOT EXISTS"));

        let drop = serializer
            .serialize_operation(&DropTable { name: "T".into() }.into())
            .unwrap();
        assert_eq!(drop, "DROP TABLE IF EXISTS \"T\"");
    }

    #[test]
    fn add_column_renders_default() {
        let serializer = Serializer::new(Flavor::Postgresql);
        let op = AddColumn {
            table: "Person".into(),
            column: ColumnDef {
                name: "Age".to_string(),
                ty: Type::I32,
                nullable: false,
                default_value: Some(tessera_core::stmt::Value::from(0i32)),
                default_sql: None,
            },
        };

        let sql = serializer.serialize_operation(&op.into()).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE \"Person\" ADD COLUMN \"Age\" INTEGER NOT NULL DEFAULT 0"
        );
    }

    #[test]
    fn sqlite_rejects_alter_column() {
        let serializer = Serializer::new(Flavor::Sqlite);
        let op = AlterColumn {
            table: "Person".into(),
            column: nullable_column("Age", Type::I64),
            destructive: false,
        };

        assert!(serializer.serialize_operation(&op.into()).is_err());
    }

    #[test]
    fn script_joins_with_the_batch_terminator() {
        let serializer = Serializer::new(Flavor::Postgresql);
        let ops = vec![
            MigrationOperation::from(DropTable { name: "A".into() }),
            MigrationOperation::from(DropTable { name: "B".into() }),
        ];

        let script = serializer.script(&ops).unwrap();
        assert_eq!(script, "DROP TABLE \"A\";\nDROP TABLE \"B\";\n");
    }
}
