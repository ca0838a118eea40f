//! # pgstmt
//!
//! A fluent, in-memory SQL statement builder.
//!
//! A [`Statement`] accumulates clause declarations (statement type, table,
//! params, where, order, limit, custom fragments) in any order and compiles
//! them on demand into one SQL string. Compiled text can be run through an
//! [`Executor`] (a `tokio_postgres::Client` or a pooled client).
//!
//! ## Features
//!
//! - **Order-independent compilation**: the statement type is resolved first,
//!   whatever order clauses were declared in
//! - **Shape detection**: one row, many rows or raw text, detected from the
//!   payload (including any `serde::Serialize` value)
//! - **Overwrite semantics**: re-declaring a clause replaces it; custom
//!   fragments accumulate by label
//! - **Execution**: selects return a [`Selection`], writes run in their own
//!   transaction
//!
//! ## Injection risk
//!
//! Values are interpolated into the SQL text, not bound as parameters.
//! INSERT and UPDATE values are quoted and escaped; WHERE values are inserted
//! verbatim. Sanitize anything untrusted before it reaches the builder.
//!
//! ## Example
//!
//! ```
//! use pgstmt::Statement;
//! use serde_json::json;
//!
//! let mut stmt = Statement::new();
//! stmt.insert()
//!     .table("users")
//!     .params(json!([
//!         {"name": "alice", "active": true},
//!         {"name": "bob", "active": false}
//!     ]));
//!
//! assert_eq!(
//!     stmt.compile().unwrap(),
//!     "INSERT INTO users (name,active) VALUES ('alice',true),('bob',false)"
//! );
//! ```

pub mod clause;
pub mod client;
pub mod compile;
pub mod config;
pub mod connect;
pub mod error;
pub mod payload;
pub mod run;
pub mod statement;
pub mod value;

pub use clause::{Clause, ClauseKind, ClauseName, ClauseSet, StatementType};
pub use client::Executor;
pub use compile::compile;
pub use config::{ConnectConfig, ExecConfig, StatementConfig};
pub use connect::connect;
pub use error::{StmtError, StmtResult};
pub use payload::Payload;
pub use run::{Outcome, Selection};
pub use statement::{Statement, statement};
pub use value::{Record, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from, create_pool_with_config};

#[cfg(feature = "tracing")]
mod trace;
