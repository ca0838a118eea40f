//! Error types for pgstmt

use thiserror::Error;

/// Result type alias for pgstmt operations
pub type StmtResult<T> = Result<T, StmtError>;

/// Errors raised while declaring, compiling or running a statement.
///
/// Compilation never touches the network, so the compile-side variants
/// (`UnsupportedClause`, `InvalidPayload`, `MalformedInsertShape`,
/// `MissingStatementType`) are disjoint from the execution-side ones.
#[derive(Debug, Error)]
pub enum StmtError {
    /// A clause was declared under a name that is not a known clause kind
    #[error("Unsupported clause: {0}")]
    UnsupportedClause(String),

    /// A known clause was declared with a payload it cannot hold
    #[error("Invalid payload for {clause}: {message}")]
    InvalidPayload { clause: String, message: String },

    /// Insert rows cannot be reconciled into one column list
    #[error("Malformed insert shape: {0}")]
    MalformedInsertShape(String),

    /// Strict compilation without a declared statement type
    #[error("Missing statement type")]
    MissingStatementType,

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement preparation or execution error
    #[error("Execution error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// Transaction commit error
    #[error("Commit failed: {0}")]
    Commit(String),

    /// Statement timeout error
    #[error("Statement timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StmtError {
    /// Create an unsupported clause error
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedClause(name.into())
    }

    /// Create an invalid payload error for a clause
    pub fn invalid_payload(clause: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            clause: clause.into(),
            message: message.into(),
        }
    }

    /// Create a malformed insert shape error
    pub fn malformed_insert(message: impl Into<String>) -> Self {
        Self::MalformedInsertShape(message.into())
    }

    /// Check if this error was raised by declaration or compilation
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedClause(_)
                | Self::InvalidPayload { .. }
                | Self::MalformedInsertShape(_)
                | Self::MissingStatementType
        )
    }

    /// Check if this error was raised by the execution layer
    pub fn is_execution_error(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Execution(_) | Self::Commit(_) | Self::Timeout(_) => true,
            #[cfg(feature = "pool")]
            Self::Pool(_) => true,
            _ => false,
        }
    }

    /// Check if this is an unsupported clause error
    pub fn is_unsupported_clause(&self) -> bool {
        matches!(self, Self::UnsupportedClause(_))
    }
}

impl From<serde_json::Error> for StmtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for StmtError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
