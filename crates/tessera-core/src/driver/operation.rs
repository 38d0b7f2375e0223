mod query;
pub use query::Query;

mod sql_batch;
pub use sql_batch::SqlBatch;

mod transaction;
pub use transaction::Transaction;

/// One operation handed to a [`super::Connection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Execute a rendered provider-native query.
    Query(Query),

    /// Execute a batch of raw SQL statements.
    SqlBatch(SqlBatch),

    /// Transaction control.
    Transaction(Transaction),
}

impl From<Query> for Operation {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}

impl From<SqlBatch> for Operation {
    fn from(value: SqlBatch) -> Self {
        Self::SqlBatch(value)
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Self {
        Self::Transaction(value)
    }
}
