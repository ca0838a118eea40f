//! Statement compiler.
//!
//! Turns a [`ClauseSet`] into SQL text. Compilation is pure: it reads the set,
//! never mutates it, and performs no I/O, so compiling twice yields the same
//! string.
//!
//! Rendering order does not depend on declaration order:
//!
//! 1. statement keyword
//! 2. `params` then table for `SELECT` (`SELECT cols FROM table`), table then
//!    `params` for every other type
//! 3. `WHERE`
//! 4. custom fragments, in declaration order
//! 5. `ORDER BY`
//! 6. `LIMIT`

use crate::clause::{ClauseKind, ClauseSet, StatementType};
use crate::config::StatementConfig;
use crate::error::{StmtError, StmtResult};
use crate::payload::{Payload, join_raw};
use crate::value::{Record, is_ordinal};


/// Compile a clause set into one SQL statement.
pub fn compile(set: &ClauseSet, config: &StatementConfig) -> StmtResult<String> {
    let ty = set.statement_type();
    if ty.is_none() && config.require_statement_type {
        return Err(StmtError::MissingStatementType);
    }

    let mut out = Output::default();

    if let Some(ty) = ty {
        out.spaced(ty.keyword());
    }

    let params = set.params().map(|p| render_params(ty, p)).transpose()?;
    if ty == Some(StatementType::Select) {
        if let Some(params) = &params {
            out.spaced(params);
        }
        if let Some(table) = set.table() {
            out.spaced(table);
        }
    } else {
        if let Some(table) = set.table() {
            out.spaced(table);
        }
        if let Some(params) = &params {
            out.spaced(params);
        }
    }

    if let Some(filter) = set.filter().and_then(render_where) {
        out.spaced(&filter);
    }

    for (_, text, padded) in set.customs() {
        if padded {
            out.padded(text);
        } else {
            out.tight(text);
        }
    }

    for kind in [ClauseKind::Order, ClauseKind::Limit] {
        if let Some(fragment) = set.fragment(kind) {
            out.spaced(fragment);
        }
    }

    let sql = out.finish();

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "pgstmt.compile",
        statement_type = ty.map(StatementType::verb).unwrap_or("-"),
        clauses = set.len(),
        sql = %sql,
    );

    Ok(sql)
}

#[derive(Default)]
struct Output {
    sql: String,
    /// The last fragment was padded and still owes its trailing space.
    pad_pending: bool,
}

impl Output {
    /// Append with a single separating space.
    fn spaced(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if !self.sql.is_empty() && !self.sql.ends_with(' ') && !fragment.starts_with(' ') {
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
        self.pad_pending = false;
    }

    /// Append a fragment wrapped in single spaces on both sides.
    fn padded(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.spaced(fragment);
        self.pad_pending = true;
    }

    /// Append directly to the preceding text, unless a padded fragment
    /// precedes it.
    fn tight(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if self.pad_pending && !self.sql.ends_with(' ') && !fragment.starts_with(' ') {
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
        self.pad_pending = false;
    }

    fn finish(self) -> String {
        self.sql.trim().to_string()
    }
}

fn render_params(ty: Option<StatementType>, payload: &Payload) -> StmtResult<String> {
    match ty {
        Some(StatementType::Insert) => render_insert(payload),
        Some(StatementType::Select) => {
            let columns = match payload {
                Payload::List(items) => join_raw(items.iter()),
                other => other.passthrough(),
            };
            Ok(format!("{columns} FROM"))
        }
        Some(StatementType::Update) => Ok(match payload {
            Payload::Map(record) => format!("SET {}", set_list(record)),
            other => format!("SET {}", other.passthrough()),
        }),
        Some(StatementType::Delete | StatementType::Drop) | None => Ok(payload.passthrough()),
    }
}

fn render_insert(payload: &Payload) -> StmtResult<String> {
    match payload {
        Payload::Map(record) => insert_rows(std::slice::from_ref(record)),
        Payload::Rows(rows) => insert_rows(rows),
        Payload::List(items) => Ok(format!(
            "VALUES ({})",
            items
                .iter()
                .map(|v| v.to_literal())
                .collect::<Vec<_>>()
                .join(",")
        )),
        Payload::Text(text) => Ok(text.clone()),
    }
}

/// `(c1,c2) VALUES (..),(..)` with columns in first-seen order across rows.
fn insert_rows(rows: &[Record]) -> StmtResult<String> {
    if rows.is_empty() {
        return Err(StmtError::malformed_insert("no rows to insert"));
    }

    let mut columns: Vec<&str> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        if row.is_empty() {
            return Err(StmtError::malformed_insert(format!("row {i} has no columns")));
        }
        for key in row.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut tuples = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row.get(column).ok_or_else(|| {
                StmtError::malformed_insert(format!("row {i} is missing column '{column}'"))
            })?;
            values.push(value.to_literal());
        }
        tuples.push(format!("({})", values.join(",")));
    }

    Ok(format!("({}) VALUES {}", columns.join(","), tuples.join(",")))
}

fn set_list(record: &Record) -> String {
    record
        .iter()
        .map(|(k, v)| format!("{k} = {}", v.to_literal()))
        .collect::<Vec<_>>()
        .join(",")
}

/// WHERE values are not escaped; callers pre-format them.
///
/// An empty predicate body renders nothing rather than a dangling `WHERE`.
fn render_where(payload: &Payload) -> Option<String> {
    let body = match payload {
        Payload::Text(text) => text.clone(),
        Payload::List(items) => items
            .iter()
            .map(|v| v.to_raw())
            .collect::<Vec<_>>()
            .join(" "),
        Payload::Map(record) => predicates(record),
        Payload::Rows(rows) => rows.iter().map(predicates).collect::<Vec<_>>().join(" "),
    };
    let body = body.trim();
    (!body.is_empty()).then(|| format!("WHERE {body}"))
}

fn predicates(record: &Record) -> String {
    record
        .iter()
        .map(|(k, v)| {
            if is_ordinal(k) {
                v.to_raw()
            } else {
                format!("{k} = {}", v.to_raw())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
