//! Migration application.
//!
//! One run walks: ensure the history table exists, compute the delta of
//! pending migrations against the applied rows, then apply each pending
//! migration inside its own transaction (batch, history row, commit). A
//! failing command rolls back only that migration's transaction and
//! halts the run; migrations committed earlier stay applied, and nothing
//! retries automatically. Cancellation is honored between migrations,
//! never mid-transaction.

use super::{history::HistoryRepository, op::MigrationOperation};
use crate::serializer::Serializer;
use std::collections::HashSet;
use tessera_core::{
    driver::{operation::SqlBatch, operation::Transaction, Connection, Operation},
    stmt::Value,
    Error, Result,
};
use tokio_util::sync::CancellationToken;

/// One named migration: the operations that apply it and the operations
/// that revert it.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: String,
    pub operations: Vec<MigrationOperation>,
    pub down: Vec<MigrationOperation>,
}

impl Migration {
    pub fn new(id: impl Into<String>, operations: Vec<MigrationOperation>) -> Self {
        Self {
            id: id.into(),
            operations,
            down: vec![],
        }
    }

    pub fn with_down(mut self, down: Vec<MigrationOperation>) -> Self {
        self.down = down;
        self
    }
}

/// What one run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrateSummary {
    pub applied: Vec<String>,

    /// True when the run stopped early because cancellation was
    /// requested.
    pub cancelled: bool,
}

/// Applies migrations over one connection, sequentially.
pub struct Migrator<'a> {
    connection: &'a mut dyn Connection,
    serializer: Serializer,
    history: HistoryRepository,
}

impl<'a> Migrator<'a> {
    pub fn new(connection: &'a mut dyn Connection, serializer: Serializer) -> Self {
        Self {
            connection,
            serializer,
            history: HistoryRepository::new(),
        }
    }

    pub fn with_history(mut self, history: HistoryRepository) -> Self {
        self.history = history;
        self
    }

    /// Apply every migration not yet recorded in the history table, in
    /// the given order.
    pub async fn migrate(
        &mut self,
        migrations: &[Migration],
        cancel: &CancellationToken,
    ) -> Result<MigrateSummary> {
        self.ensure_history_table().await?;
        let applied = self.applied_ids().await?;

        let mut summary = MigrateSummary::default();

        for migration in migrations {
            if applied.contains(&migration.id) {
                continue;
            }

            if cancel.is_cancelled() {
                tracing::info!(migration = %migration.id, "migration run cancelled");
                summary.cancelled = true;
                break;
            }

            let mut statements = self.serializer.serialize_batch(&migration.operations)?;
            statements.push(self.history.insert_statement(&migration.id));

            self.apply_one(&migration.id, statements).await?;

            tracing::info!(migration = %migration.id, "migration applied");
            summary.applied.push(migration.id.clone());
        }

        Ok(summary)
    }

    /// Revert one applied migration using its down operations.
    pub async fn revert(&mut self, migration: &Migration) -> Result<()> {
        self.ensure_history_table().await?;

        let mut statements = self.serializer.serialize_batch(&migration.down)?;
        statements.push(self.history.delete_statement(&migration.id));

        self.apply_one(&migration.id, statements).await?;

        tracing::info!(migration = %migration.id, "migration reverted");
        Ok(())
    }

    async fn ensure_history_table(&mut self) -> Result<()> {
        let statement = self.history.create_statement(self.serializer.flavor());
        self.connection
            .exec(Operation::SqlBatch(SqlBatch::one(statement)))
            .await?;
        Ok(())
    }

    async fn applied_ids(&mut self) -> Result<HashSet<String>> {
        let response = self
            .connection
            .exec(Operation::SqlBatch(SqlBatch::one(
                self.history.select_applied(),
            )))
            .await?;

        let mut ids = HashSet::new();
        for mut row in response.rows {
            match row.take(0)? {
                Value::String(id) => {
                    ids.insert(id);
                }
                other => {
                    return Err(Error::type_conversion(format!(
                        "history row holds {:?} where a migration id was expected",
                        other.ty()
                    )))
                }
            }
        }
        Ok(ids)
    }

    /// Run one migration's statements inside its own transaction. The
    /// transaction is rolled back on the error path before the error
    /// surfaces.
    async fn apply_one(&mut self, id: &str, statements: Vec<String>) -> Result<()> {
        self.connection
            .exec(Operation::Transaction(Transaction::Begin))
            .await?;

        let result = self
            .connection
            .exec(Operation::SqlBatch(SqlBatch { statements }))
            .await;

        match result {
            Ok(_) => {
                self.connection
                    .exec(Operation::Transaction(Transaction::Commit))
                    .await?;
                Ok(())
            }
            Err(err) => {
                // Best effort: a broken connection cannot roll back, and
                // the original failure is the error worth surfacing.
                let _ = self
                    .connection
                    .exec(Operation::Transaction(Transaction::Rollback))
                    .await;
                Err(err.context(Error::migration_failed(id)))
            }
        }
    }
}
