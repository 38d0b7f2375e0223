//! Request execution with per-context result caching.
//!
//! Results cache under the request's structural fingerprint (table +
//! normalized filter text + row limit) for the lifetime of one executor.
//! The cache takes no lock across the request itself: two threads
//! racing on first access may both execute, and the later writer wins.
//! That is acceptable because equal fingerprints produce value-equal
//! results.

use crate::query::{Params, TableQuery};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tessera_core::{async_trait, driver::operation, driver::Rows, Result};

/// The storage collaborator: executes one rendered request and returns
/// raw rows.
#[async_trait]
pub trait TableClient: Send + Sync {
    async fn execute(&self, request: &operation::Query) -> Result<Rows>;
}

pub struct QueryExecutor<C> {
    client: C,
    cache: Mutex<HashMap<crate::query::Fingerprint, Arc<Rows>>>,
}

impl<C: TableClient> QueryExecutor<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Execute a provider query, serving repeated fingerprints from the
    /// cache.
    pub async fn execute(&self, query: &TableQuery, params: &Params) -> Result<Arc<Rows>> {
        let fingerprint = query.fingerprint(params)?;

        if let Some(rows) = self
            .cache
            .lock()
            .expect("result cache poisoned")
            .get(&fingerprint)
        {
            tracing::debug!(table = %fingerprint.table, "query cache hit");
            return Ok(rows.clone());
        }

        let request = query.to_request(params)?;
        tracing::debug!(table = %request.table, filter = ?request.filter, "executing request");

        let rows = Arc::new(self.client.execute(&request).await?);

        self.cache
            .lock()
            .expect("result cache poisoned")
            .insert(fingerprint, rows.clone());

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tessera_core::{
        schema::Builder,
        stmt::{Value, ValueBuffer},
    };

    struct CountingClient {
        executions: AtomicUsize,
    }

    #[async_trait]
    impl TableClient for CountingClient {
        async fn execute(&self, request: &operation::Query) -> Result<Rows> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ValueBuffer::new(vec![Value::from(
                request.table.as_str(),
            )])])
        }
    }

    fn person_query() -> TableQuery {
        let schema = Builder::new()
            .entity("Person", |e| {
                e.property("Id", tessera_core::stmt::Type::I64);
                e.primary_key(&["Id"]);
            })
            .build()
            .unwrap();

        TableQuery::new("Person", schema.entities[0].id)
    }

    #[tokio::test]
    async fn repeated_fingerprints_hit_the_cache() {
        let executor = QueryExecutor::new(CountingClient {
            executions: AtomicUsize::new(0),
        });
        let query = person_query();
        let params = Params::new();

        let first = executor.execute(&query, &params).await.unwrap();
        let second = executor.execute(&query, &params).await.unwrap();

        assert_eq!(executor.client().executions.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_limits_execute_separately() {
        let executor = QueryExecutor::new(CountingClient {
            executions: AtomicUsize::new(0),
        });
        let params = Params::new();

        let unlimited = person_query();
        let mut limited = person_query();
        limited.set_take(5);

        executor.execute(&unlimited, &params).await.unwrap();
        executor.execute(&limited, &params).await.unwrap();

        assert_eq!(executor.client().executions.load(Ordering::SeqCst), 2);
    }
}
