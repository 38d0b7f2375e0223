use tessera_core::{
    async_trait,
    driver::{Connection, Operation, Response},
    stmt::{Value, ValueBuffer},
    Error, Result,
};
use tessera_sql::{
    migrate::{Migration, Migrator},
    Flavor, Serializer,
};
use tokio_util::sync::CancellationToken;

/// Records every operation and can be programmed to fail a statement or
/// report already-applied migrations.
struct FakeConnection {
    log: Vec<Operation>,
    applied: Vec<String>,
    fail_on: Option<String>,
}

impl FakeConnection {
    fn new() -> Self {
        Self {
            log: vec![],
            applied: vec![],
            fail_on: None,
        }
    }

    fn statements(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Operation::SqlBatch(batch) => Some(batch.statements.iter()),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn transactions(&self) -> Vec<&Operation> {
        self.log
            .iter()
            .filter(|op| matches!(op, Operation::Transaction(_)))
            .collect()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        self.log.push(op.clone());

        if let Operation::SqlBatch(batch) = &op {
            if let Some(needle) = &self.fail_on {
                if batch.statements.iter().any(|s| s.contains(needle.as_str())) {
                    return Err(Error::driver_operation_failed(std::io::Error::other(
                        "statement rejected",
                    )));
                }
            }

            if batch.statements.iter().any(|s| s.starts_with("SELECT")) {
                let rows = self
                    .applied
                    .iter()
                    .map(|id| ValueBuffer::new(vec![Value::from(id.as_str())]))
                    .collect();
                return Ok(Response::from_rows(rows));
            }
        }

        Ok(Response::empty())
    }
}

fn drop_widgets(id: &str) -> Migration {
    use tessera_sql::migrate::op::{DropTable, MigrationOperation};

    Migration::new(
        id,
        vec![MigrationOperation::DropTable(DropTable {
            name: "Widgets".into(),
        })],
    )
}

#[tokio::test]
async fn applies_pending_migrations_in_their_own_transactions() {
    let mut connection = FakeConnection::new();
    let serializer = Serializer::new(Flavor::Postgresql);
    let mut migrator = Migrator::new(&mut connection, serializer);

    let migrations = vec![drop_widgets("0001_drop"), drop_widgets("0002_drop_again")];
    let summary = migrator
        .migrate(&migrations, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.applied, vec!["0001_drop", "0002_drop_again"]);
    assert!(!summary.cancelled);

    // Begin/Commit once per migration, no rollbacks.
    use tessera_core::driver::operation::Transaction;
    let transactions = connection.transactions();
    assert_eq!(transactions.len(), 4);
    assert!(transactions
        .iter()
        .all(|op| !matches!(op, Operation::Transaction(Transaction::Rollback))));

    // Each migration's batch carries its history insert.
    let inserts: Vec<_> = connection
        .statements()
        .into_iter()
        .filter(|s| s.starts_with("INSERT INTO \"__tessera_migrations\""))
        .collect();
    assert_eq!(inserts.len(), 2);
}

#[tokio::test]
async fn already_applied_migrations_are_skipped() {
    let mut connection = FakeConnection::new();
    connection.applied.push("0001_drop".to_string());

    let serializer = Serializer::new(Flavor::Postgresql);
    let mut migrator = Migrator::new(&mut connection, serializer);

    let migrations = vec![drop_widgets("0001_drop"), drop_widgets("0002_drop_again")];
    let summary = migrator
        .migrate(&migrations, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.applied, vec!["0002_drop_again"]);
}

#[tokio::test]
async fn failure_rolls_back_and_halts_with_the_migration_id() {
    let mut connection = FakeConnection::new();
    connection.fail_on = Some("DROP TABLE".to_string());

    let serializer = Serializer::new(Flavor::Postgresql);
    let mut migrator = Migrator::new(&mut connection, serializer);

    let migrations = vec![drop_widgets("0001_drop"), drop_widgets("0002_drop_again")];
    let err = migrator
        .migrate(&migrations, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("0001_drop"));

    use tessera_core::driver::operation::Transaction;
    assert!(connection
        .transactions()
        .iter()
        .any(|op| matches!(op, Operation::Transaction(Transaction::Rollback))));

    // The second migration never started.
    assert!(!connection
        .statements()
        .iter()
        .any(|s| s.contains("0002_drop_again")));
}

#[tokio::test]
async fn cancellation_stops_between_migrations() {
    let mut connection = FakeConnection::new();
    let serializer = Serializer::new(Flavor::Postgresql);
    let mut migrator = Migrator::new(&mut connection, serializer);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let migrations = vec![drop_widgets("0001_drop")];
    let summary = migrator.migrate(&migrations, &cancel).await.unwrap();

    assert!(summary.cancelled);
    assert!(summary.applied.is_empty());
    // History bookkeeping ran; no transaction was opened.
    assert!(connection.transactions().is_empty());
}

#[tokio::test]
async fn revert_runs_down_operations_and_deletes_history() {
    use tessera_sql::migrate::op::{CreateTable, DropTable, MigrationOperation};

    let mut connection = FakeConnection::new();
    let serializer = Serializer::new(Flavor::Postgresql);
    let mut migrator = Migrator::new(&mut connection, serializer);

    let migration = Migration::new(
        "0001_drop",
        vec![MigrationOperation::DropTable(DropTable {
            name: "Widgets".into(),
        })],
    )
    .with_down(vec![MigrationOperation::CreateTable(CreateTable {
        name: "Widgets".into(),
        columns: vec![],
        primary_key: None,
        foreign_keys: vec![],
    })]);

    migrator.revert(&migration).await.unwrap();

    let statements = connection.statements();
    assert!(statements.iter().any(|s| s.starts_with("CREATE TABLE")));
    assert!(statements
        .iter()
        .any(|s| s.starts_with("DELETE FROM \"__tessera_migrations\"")));
}
