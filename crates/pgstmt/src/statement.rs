//! The clause-declaration surface.
//!
//! # Example
//!
//! ```
//! use pgstmt::{Record, Statement};
//!
//! let mut stmt = Statement::new();
//! stmt.select()
//!     .params(["id", "name"])
//!     .table("users")
//!     .where_clause(Record::new().with("id", 5))
//!     .limit(1);
//!
//! assert_eq!(
//!     stmt.compile().unwrap(),
//!     "SELECT id,name FROM users WHERE id = 5 LIMIT 1"
//! );
//! ```

use crate::clause::{
    Clause, ClauseKind, ClauseName, ClauseSet, DEFAULT_CUSTOM_LABEL, StatementType,
};
use crate::compile::compile;
use crate::config::StatementConfig;
use crate::error::{StmtError, StmtResult};
use crate::payload::Payload;
use std::fmt;

/// Accumulates clause declarations and compiles them on demand.
///
/// One instance builds one logical statement; it is not meant to be shared.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    clauses: ClauseSet,
    config: StatementConfig,
}

/// Start building a statement.
pub fn statement() -> Statement {
    Statement::new()
}

impl Statement {
    /// Create an empty statement with the permissive compile policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty statement with the given compile policy.
    pub fn with_config(config: StatementConfig) -> Self {
        Self {
            clauses: ClauseSet::new(),
            config,
        }
    }

    pub fn config(&self) -> &StatementConfig {
        &self.config
    }

    /// Store a clause, overwriting any earlier clause in the same slot.
    pub fn declare(&mut self, clause: Clause) -> &mut Self {
        self.clauses.insert(clause);
        self
    }

    /// Declare a clause by its caller-facing name (`select`, `table`, `where`, ...).
    ///
    /// Statement verbs ignore `payload`. Names are matched case-insensitively.
    /// On error the clause set is left untouched.
    pub fn declare_named(
        &mut self,
        name: &str,
        payload: impl Into<Payload>,
    ) -> StmtResult<&mut Self> {
        let clause = match name.parse::<ClauseName>()? {
            ClauseName::Verb(ty) => Clause::Type(ty),
            ClauseName::Kind(kind) => {
                let payload = payload.into();
                match kind {
                    ClauseKind::Params => Clause::Params(payload),
                    ClauseKind::Where => Clause::Where(payload),
                    ClauseKind::Table => Clause::Table(scalar(kind, &payload)?),
                    ClauseKind::Limit => Clause::limit(scalar(kind, &payload)?),
                    ClauseKind::Order => Clause::order(scalar(kind, &payload)?),
                    ClauseKind::Type | ClauseKind::Custom => {
                        return Err(StmtError::unsupported(name));
                    }
                }
            }
        };
        Ok(self.declare(clause))
    }

    /// Declare the statement type.
    pub fn kind(&mut self, ty: StatementType) -> &mut Self {
        self.declare(Clause::Type(ty))
    }

    pub fn select(&mut self) -> &mut Self {
        self.kind(StatementType::Select)
    }

    pub fn insert(&mut self) -> &mut Self {
        self.kind(StatementType::Insert)
    }

    pub fn update(&mut self) -> &mut Self {
        self.kind(StatementType::Update)
    }

    pub fn delete(&mut self) -> &mut Self {
        self.kind(StatementType::Delete)
    }

    pub fn drop_table(&mut self) -> &mut Self {
        self.kind(StatementType::Drop)
    }

    /// Declare the target table.
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(Clause::Table(name.into()))
    }

    /// Declare columns (select), rows (insert), assignments (update) or a raw body.
    pub fn params(&mut self, payload: impl Into<Payload>) -> &mut Self {
        self.declare(Clause::Params(payload.into()))
    }

    /// Declare the WHERE predicate.
    ///
    /// Values are interpolated as-is, without quoting.
    pub fn where_clause(&mut self, payload: impl Into<Payload>) -> &mut Self {
        self.declare(Clause::Where(payload.into()))
    }

    /// Declare `LIMIT n`.
    pub fn limit(&mut self, n: impl fmt::Display) -> &mut Self {
        self.declare(Clause::limit(n))
    }

    /// Declare `ORDER BY expr`.
    pub fn order(&mut self, expr: impl fmt::Display) -> &mut Self {
        self.declare(Clause::order(expr))
    }

    /// Append a padded custom fragment under the default label.
    pub fn custom(&mut self, text: impl Into<String>) -> &mut Self {
        self.custom_with(text, true, DEFAULT_CUSTOM_LABEL)
    }

    /// Append a custom fragment.
    ///
    /// Fragments with distinct labels accumulate; reusing a label replaces
    /// that fragment. Without `padding` the text is glued to the preceding
    /// fragment.
    pub fn custom_with(
        &mut self,
        text: impl Into<String>,
        padding: bool,
        label: impl Into<String>,
    ) -> &mut Self {
        self.declare(Clause::custom(text, padding, label))
    }

    /// The accumulated clauses, in declaration order.
    pub fn call_stack(&self) -> &ClauseSet {
        &self.clauses
    }

    pub fn statement_type(&self) -> Option<StatementType> {
        self.clauses.statement_type()
    }

    /// Drop every declared clause.
    pub fn reset(&mut self) -> &mut Self {
        self.clauses.clear();
        self
    }

    /// Compile the declared clauses into SQL text.
    ///
    /// Computed fresh on every call.
    pub fn compile(&self) -> StmtResult<String> {
        compile(&self.clauses, &self.config)
    }
}

fn scalar(kind: ClauseKind, payload: &Payload) -> StmtResult<String> {
    payload.as_scalar().ok_or_else(|| {
        StmtError::invalid_payload(
            kind.as_str(),
            format!("expected a single value, got {}", payload.shape()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn named_declarations() {
        let mut stmt = Statement::new();
        stmt.declare_named("Select", "")
            .unwrap()
            .declare_named("params", json!(["a", "b"]))
            .unwrap()
            .declare_named("TABLE", "t")
            .unwrap()
            .declare_named("limit", json!(3))
            .unwrap()
            .declare_named("order", "a DESC")
            .unwrap();

        assert_eq!(stmt.compile().unwrap(), "SELECT a,b FROM t ORDER BY a DESC LIMIT 3");
    }

    #[test]
    fn unsupported_name_leaves_clauses_untouched() {
        let mut stmt = Statement::new();
        stmt.select().table("t");
        let before = stmt.call_stack().clone();

        let err = stmt.declare_named("join", "other").unwrap_err();
        assert!(matches!(err, StmtError::UnsupportedClause(ref n) if n == "join"));
        assert_eq!(stmt.call_stack(), &before);

        let err = stmt.declare_named("custom", "x").unwrap_err();
        assert!(err.is_unsupported_clause());
        assert_eq!(stmt.call_stack(), &before);
    }

    #[test]
    fn scalar_clauses_reject_structured_payloads() {
        let mut stmt = Statement::new();
        let err = stmt.declare_named("table", json!({"a": 1})).unwrap_err();
        assert!(matches!(err, StmtError::InvalidPayload { ref clause, .. } if clause == "table"));
        assert!(stmt.call_stack().is_empty());
    }

    #[test]
    fn limit_and_order_are_rendered_on_declaration() {
        let mut stmt = Statement::new();
        stmt.limit(10).order("id");
        let stored: Vec<_> = stmt.call_stack().iter().cloned().collect();
        assert_eq!(
            stored,
            [
                Clause::Limit("LIMIT 10".into()),
                Clause::Order("ORDER BY id".into())
            ]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut stmt = statement();
        stmt.delete().table("t");
        assert_eq!(stmt.call_stack().len(), 2);
        stmt.reset();
        assert!(stmt.call_stack().is_empty());
        assert_eq!(stmt.statement_type(), None);
    }
}
