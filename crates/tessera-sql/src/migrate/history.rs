use crate::serializer::Flavor;

/// The migrations history table: one row per applied migration.
///
/// Statement text is rendered here rather than through the operation
/// serializer because the table addresses itself by fixed name and must
/// exist before any migration runs.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    table: String,
}

impl Default for HistoryRepository {
    fn default() -> Self {
        Self {
            table: "__tessera_migrations".to_string(),
        }
    }
}

impl HistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn create_statement(&self, flavor: Flavor) -> String {
        let timestamp = match flavor {
            Flavor::Postgresql => "TIMESTAMPTZ",
            Flavor::Sqlite => "TEXT",
        };
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
             \n    \"migration_id\" TEXT NOT NULL,\
             \n    \"applied_at\" {timestamp} NOT NULL,\
             \n    PRIMARY KEY (\"migration_id\")\
             \n)",
            self.table
        )
    }

    pub fn select_applied(&self) -> String {
        format!(
            "SELECT \"migration_id\" FROM \"{}\" ORDER BY \"migration_id\"",
            self.table
        )
    }

    pub fn insert_statement(&self, migration_id: &str) -> String {
        format!(
            "INSERT INTO \"{}\" (\"migration_id\", \"applied_at\") VALUES ('{}', CURRENT_TIMESTAMP)",
            self.table,
            escape(migration_id)
        )
    }

    pub fn delete_statement(&self, migration_id: &str) -> String {
        format!(
            "DELETE FROM \"{}\" WHERE \"migration_id\" = '{}'",
            self.table,
            escape(migration_id)
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_quote_the_migration_id() {
        let history = HistoryRepository::new();
        let insert = history.insert_statement("2024_01_init");

        assert!(insert.contains("'2024_01_init'"));
        assert!(insert.contains("__tessera_migrations"));
    }
}
