//! SQL logging through `tracing`, driven by [`ExecConfig`].

use crate::clause::StatementType;
use crate::config::ExecConfig;
use std::borrow::Cow;
use tracing::Level;

/// Emit one event for `sql` on target `pgstmt.sql` at `config.log_level`.
pub(crate) fn log_sql(config: &ExecConfig, statement_type: Option<StatementType>, sql: &str) {
    if !config.log_sql {
        return;
    }

    let sql = shorten(sql, config.max_sql_length);
    let statement_type = statement_type.map(StatementType::verb).unwrap_or("-");
    match config.log_level {
        Level::ERROR => tracing::error!(target: "pgstmt.sql", statement_type, sql = %sql),
        Level::WARN => tracing::warn!(target: "pgstmt.sql", statement_type, sql = %sql),
        Level::INFO => tracing::info!(target: "pgstmt.sql", statement_type, sql = %sql),
        Level::DEBUG => tracing::debug!(target: "pgstmt.sql", statement_type, sql = %sql),
        Level::TRACE => tracing::trace!(target: "pgstmt.sql", statement_type, sql = %sql),
    }
}

fn shorten(sql: &str, max_bytes: Option<usize>) -> Cow<'_, str> {
    match max_bytes {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while end > 0 && !sql.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!("{}...", &sql[..end]))
        }
        _ => Cow::Borrowed(sql),
    }
}
