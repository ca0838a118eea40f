//! Compile policy, execution and connection settings.

use crate::error::{StmtError, StmtResult};
use std::time::Duration;

/// Compile policy for a [`Statement`](crate::Statement).
///
/// By default compilation is permissive: a statement without a declared type
/// still compiles, rendering `params` through the passthrough branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementConfig {
    /// Fail with [`StmtError::MissingStatementType`] when no type is declared.
    pub require_statement_type: bool,
}

impl StatementConfig {
    /// Create a new configuration with defaults (permissive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict compilation: a statement type must be declared.
    pub fn strict() -> Self {
        Self {
            require_statement_type: true,
        }
    }

    /// Set whether a statement type is required.
    pub fn require_statement_type(mut self, require: bool) -> Self {
        self.require_statement_type = require;
        self
    }
}

/// Settings consumed when running a compiled statement.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Statement timeout. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    /// Whether to emit the SQL via `tracing` before execution.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Tracing event level for logged SQL.
    #[cfg(feature = "tracing")]
    pub log_level: tracing::Level,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            log_sql: true,
            max_sql_length: Some(200),
            #[cfg(feature = "tracing")]
            log_level: tracing::Level::DEBUG,
        }
    }
}

impl ExecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the statement timeout.
    ///
    /// Statements exceeding it return [`StmtError::Timeout`].
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Disable SQL logging.
    pub fn without_logging(mut self) -> Self {
        self.log_sql = false;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Override the tracing event level for logged SQL.
    #[cfg(feature = "tracing")]
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }
}

/// Environment variable holding the connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable holding the pool size.
pub const POOL_MAX_SIZE_ENV: &str = "PGSTMT_POOL_MAX_SIZE";

/// How to reach the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// A `tokio-postgres` connection string or URL
    pub database_url: String,
    /// Maximum pool size (used by [`pool`](crate::pool))
    pub pool_max_size: usize,
}

impl ConnectConfig {
    /// Default maximum pool size.
    pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max_size: Self::DEFAULT_POOL_MAX_SIZE,
        }
    }

    pub fn pool_max_size(mut self, max_size: usize) -> Self {
        self.pool_max_size = max_size;
        self
    }

    /// Read `DATABASE_URL` (and optionally `PGSTMT_POOL_MAX_SIZE`), loading a
    /// `.env` file first when one exists.
    pub fn from_env() -> StmtResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StmtResult<Self> {
        let database_url = lookup(DATABASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StmtError::Config(format!("{DATABASE_URL_ENV} is not set")))?;

        let mut config = Self::new(database_url);
        if let Some(raw) = lookup(POOL_MAX_SIZE_ENV) {
            config.pool_max_size = raw.trim().parse().map_err(|_| {
                StmtError::Config(format!("{POOL_MAX_SIZE_ENV} must be a positive integer"))
            })?;
            if config.pool_max_size == 0 {
                return Err(StmtError::Config(format!(
                    "{POOL_MAX_SIZE_ENV} must be a positive integer"
                )));
            }
        }
        Ok(config)
    }
}
