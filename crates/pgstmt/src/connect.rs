//! Establishing a connection.
//!
//! A failed connection is reported as [`StmtError::Connection`]; it never
//! terminates the process.

use crate::config::ConnectConfig;
use crate::error::{StmtError, StmtResult};
use tokio_postgres::NoTls;

/// Connect with `NoTls` and drive the connection on a spawned task.
///
/// Must be called from within a Tokio runtime. The returned client is an
/// [`Executor`](crate::Executor); keep one per logical unit of work and pass it
/// by `&mut` to [`Statement::run`](crate::Statement::run).
///
/// # Example
///
/// ```ignore
/// let config = pgstmt::ConnectConfig::from_env()?;
/// let mut client = pgstmt::connect(&config).await?;
/// ```
pub async fn connect(config: &ConnectConfig) -> StmtResult<tokio_postgres::Client> {
    let pg_config: tokio_postgres::Config = config
        .database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| StmtError::Connection(e.to_string()))?;

    let (client, connection) = pg_config
        .connect(NoTls)
        .await
        .map_err(|e| StmtError::Connection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            #[cfg(feature = "tracing")]
            tracing::error!(target: "pgstmt.connect", error = %e, "connection closed with error");
            #[cfg(not(feature = "tracing"))]
            let _ = e;
        }
    });

    Ok(client)
}
