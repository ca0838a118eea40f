//! Running compiled statements through an [`Executor`].
//!
//! Select statements come back as a [`Selection`]; every other statement (or
//! one without a declared type) runs in its own transaction and reports the
//! affected row count.

use crate::client::Executor;
use crate::clause::StatementType;
use crate::config::ExecConfig;
use crate::error::{StmtError, StmtResult};
use crate::statement::Statement;
use tokio_postgres::Row;

/// The rows a select statement produced.
#[derive(Debug, Default)]
pub struct Selection {
    rows: Vec<Row>,
}

impl Selection {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl IntoIterator for Selection {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// What running a statement produced.
#[derive(Debug)]
pub enum Outcome {
    /// Rows from a select statement
    Selected(Selection),
    /// Affected row count from a committed write
    Affected(u64),
}

impl Outcome {
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Selected(selection) => Some(selection),
            Self::Affected(_) => None,
        }
    }

    pub fn into_selection(self) -> Option<Selection> {
        match self {
            Self::Selected(selection) => Some(selection),
            Self::Affected(_) => None,
        }
    }

    pub fn affected(&self) -> Option<u64> {
        match self {
            Self::Affected(n) => Some(*n),
            Self::Selected(_) => None,
        }
    }
}

impl Statement {
    /// Compile and run the statement with default [`ExecConfig`].
    pub async fn run<E: Executor>(&self, executor: &mut E) -> StmtResult<Outcome> {
        self.run_with(executor, &ExecConfig::default()).await
    }

    /// Compile and run the statement.
    pub async fn run_with<E: Executor>(
        &self,
        executor: &mut E,
        config: &ExecConfig,
    ) -> StmtResult<Outcome> {
        let sql = self.compile()?;
        dispatch(self.statement_type(), executor, &sql, config).await
    }

    /// Run caller-supplied SQL in place of the compiled text, routed by this
    /// statement's declared type.
    pub async fn run_sql<E: Executor>(&self, executor: &mut E, sql: &str) -> StmtResult<Outcome> {
        dispatch(self.statement_type(), executor, sql, &ExecConfig::default()).await
    }
}

async fn dispatch<E: Executor>(
    ty: Option<StatementType>,
    executor: &mut E,
    sql: &str,
    config: &ExecConfig,
) -> StmtResult<Outcome> {
    #[cfg(feature = "tracing")]
    crate::trace::log_sql(config, ty, sql);

    let work = async {
        let outcome = if ty.is_some_and(StatementType::is_read) {
            Outcome::Selected(Selection::new(executor.query_rows(sql).await?))
        } else {
            Outcome::Affected(executor.execute_in_transaction(sql).await?)
        };
        Ok::<_, StmtError>(outcome)
    };

    match config.query_timeout {
        Some(timeout) => tokio::time::timeout(timeout, work)
            .await
            .map_err(|_| StmtError::Timeout(timeout))?,
        None => work.await,
    }
}
