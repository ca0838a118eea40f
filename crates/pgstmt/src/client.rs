//! The execution collaborator: what running a compiled statement needs from a
//! database client.

use crate::error::{StmtError, StmtResult};
use std::future::Future;
use tokio_postgres::Row;

/// A client able to run compiled statement text.
///
/// Reads are prepared and queried directly. Writes run inside their own
/// transaction: begin, prepare, execute, commit. A failed commit surfaces as
/// [`StmtError::Commit`]; a failed execute leaves the transaction uncommitted,
/// and dropping it rolls it back.
pub trait Executor: Send {
    /// Prepare `sql` and return every row it yields.
    fn query_rows(&mut self, sql: &str) -> impl Future<Output = StmtResult<Vec<Row>>> + Send;

    /// Prepare and execute `sql` in a transaction, returning the affected row count.
    fn execute_in_transaction(&mut self, sql: &str)
    -> impl Future<Output = StmtResult<u64>> + Send;
}

impl Executor for tokio_postgres::Client {
    async fn query_rows(&mut self, sql: &str) -> StmtResult<Vec<Row>> {
        let stmt = self.prepare(sql).await?;
        Ok(self.query(&stmt, &[]).await?)
    }

    async fn execute_in_transaction(&mut self, sql: &str) -> StmtResult<u64> {
        let tx = self.transaction().await?;
        let stmt = tx.prepare(sql).await?;
        let affected = tx.execute(&stmt, &[]).await?;
        tx.commit().await.map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "pgstmt.sql", error = %e, "commit failed");
            StmtError::Commit(e.to_string())
        })?;
        Ok(affected)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn query_rows(&mut self, sql: &str) -> StmtResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper -> tokio_postgres::Client).
        Executor::query_rows(&mut ***self, sql).await
    }

    async fn execute_in_transaction(&mut self, sql: &str) -> StmtResult<u64> {
        Executor::execute_in_transaction(&mut ***self, sql).await
    }
}
