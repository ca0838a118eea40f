//! Clause kinds and the accumulated clause set.

use crate::error::{StmtError, StmtResult};
use crate::payload::Payload;
use std::fmt;
use std::str::FromStr;

/// Label used by [`Statement::custom`](crate::Statement::custom).
pub const DEFAULT_CUSTOM_LABEL: &str = "custom";

/// The closed set of clause kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Type,
    Table,
    Params,
    Where,
    Limit,
    Order,
    Custom,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Table => "table",
            Self::Params => "params",
            Self::Where => "where",
            Self::Limit => "limit",
            Self::Order => "order",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which statement is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Select,
    Update,
    Insert,
    Delete,
    Drop,
}

impl StatementType {
    /// The SQL keyword text the statement starts with.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Update => "UPDATE",
            Self::Insert => "INSERT INTO",
            Self::Delete => "DELETE FROM",
            Self::Drop => "DROP TABLE",
        }
    }

    /// The caller-facing verb.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Update => "update",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Drop => "drop",
        }
    }

    /// Whether running this statement yields rows rather than an affected count.
    pub fn is_read(self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for StatementType {
    type Err = StmtError;

    fn from_str(s: &str) -> StmtResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "update" => Ok(Self::Update),
            "insert" => Ok(Self::Insert),
            "delete" => Ok(Self::Delete),
            "drop" => Ok(Self::Drop),
            _ => Err(StmtError::unsupported(s)),
        }
    }
}

/// A declaration name resolved to its clause kind.
///
/// Statement verbs (`select`, `insert`, ...) resolve to [`ClauseKind::Type`].
/// Custom fragments have no name; they are declared through
/// [`Statement::custom_with`](crate::Statement::custom_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseName {
    Verb(StatementType),
    Kind(ClauseKind),
}

impl FromStr for ClauseName {
    type Err = StmtError;

    fn from_str(s: &str) -> StmtResult<Self> {
        if let Ok(ty) = s.parse::<StatementType>() {
            return Ok(Self::Verb(ty));
        }
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Kind(ClauseKind::Table)),
            "params" => Ok(Self::Kind(ClauseKind::Params)),
            "where" => Ok(Self::Kind(ClauseKind::Where)),
            "limit" => Ok(Self::Kind(ClauseKind::Limit)),
            "order" => Ok(Self::Kind(ClauseKind::Order)),
            _ => Err(StmtError::unsupported(s)),
        }
    }
}

/// One declared clause with its payload.
///
/// `Limit` and `Order` hold their fragment already rendered
/// (`LIMIT n`, `ORDER BY expr`).
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Type(StatementType),
    Table(String),
    Params(Payload),
    Where(Payload),
    Limit(String),
    Order(String),
    Custom {
        label: String,
        text: String,
        padded: bool,
    },
}

impl Clause {
    /// Pre-render a LIMIT fragment.
    pub fn limit(n: impl fmt::Display) -> Self {
        Self::Limit(format!("LIMIT {n}"))
    }

    /// Pre-render an ORDER BY fragment.
    pub fn order(expr: impl fmt::Display) -> Self {
        Self::Order(format!("ORDER BY {expr}"))
    }

    /// A custom fragment under `label`.
    pub fn custom(text: impl Into<String>, padded: bool, label: impl Into<String>) -> Self {
        Self::Custom {
            label: label.into(),
            text: text.into(),
            padded,
        }
    }

    pub fn kind(&self) -> ClauseKind {
        match self {
            Self::Type(_) => ClauseKind::Type,
            Self::Table(_) => ClauseKind::Table,
            Self::Params(_) => ClauseKind::Params,
            Self::Where(_) => ClauseKind::Where,
            Self::Limit(_) => ClauseKind::Limit,
            Self::Order(_) => ClauseKind::Order,
            Self::Custom { .. } => ClauseKind::Custom,
        }
    }

    /// Two clauses share a slot when one overwrites the other.
    fn same_slot(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom { label: a, .. }, Self::Custom { label: b, .. }) => a == b,
            _ => self.kind() == other.kind(),
        }
    }
}

/// The builder's accumulated clauses, in declaration order.
///
/// Each kind holds at most one payload; re-declaring replaces the payload at
/// its original position. Custom fragments are slotted by label instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a clause, replacing whatever occupied its slot.
    pub fn insert(&mut self, clause: Clause) {
        match self.clauses.iter_mut().find(|c| c.same_slot(&clause)) {
            Some(slot) => *slot = clause,
            None => self.clauses.push(clause),
        }
    }

    /// The first clause of `kind`.
    pub fn get(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.kind() == kind)
    }

    /// The declared statement type, independent of declaration order.
    pub fn statement_type(&self) -> Option<StatementType> {
        self.clauses.iter().find_map(|c| match c {
            Clause::Type(ty) => Some(*ty),
            _ => None,
        })
    }

    pub fn table(&self) -> Option<&str> {
        self.clauses.iter().find_map(|c| match c {
            Clause::Table(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn params(&self) -> Option<&Payload> {
        self.clauses.iter().find_map(|c| match c {
            Clause::Params(p) => Some(p),
            _ => None,
        })
    }

    pub fn filter(&self) -> Option<&Payload> {
        self.clauses.iter().find_map(|c| match c {
            Clause::Where(p) => Some(p),
            _ => None,
        })
    }

    pub(crate) fn fragment(&self, kind: ClauseKind) -> Option<&str> {
        self.clauses.iter().find_map(|c| match (c, kind) {
            (Clause::Limit(s), ClauseKind::Limit) | (Clause::Order(s), ClauseKind::Order) => {
                Some(s.as_str())
            }
            _ => None,
        })
    }

    /// Custom fragments in declaration order.
    pub fn customs(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.clauses.iter().filter_map(|c| match c {
            Clause::Custom {
                label,
                text,
                padded,
            } => Some((label.as_str(), text.as_str(), *padded)),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clear(&mut self) {
        self.clauses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(
            "SELECT".parse::<ClauseName>().unwrap(),
            ClauseName::Verb(StatementType::Select)
        );
        assert_eq!(
            "Where".parse::<ClauseName>().unwrap(),
            ClauseName::Kind(ClauseKind::Where)
        );
        assert!("custom".parse::<ClauseName>().unwrap_err().is_unsupported_clause());
        assert!("join".parse::<ClauseName>().is_err());
    }

    #[test]
    fn keywords() {
        assert_eq!(StatementType::Insert.keyword(), "INSERT INTO");
        assert_eq!(StatementType::Delete.keyword(), "DELETE FROM");
        assert_eq!(StatementType::Drop.keyword(), "DROP TABLE");
        assert_eq!(StatementType::Drop.verb(), "drop");
    }

    #[test]
    fn redeclaring_keeps_position() {
        let mut set = ClauseSet::new();
        set.insert(Clause::Table("a".into()));
        set.insert(Clause::limit(5));
        set.insert(Clause::Table("b".into()));

        let kinds: Vec<_> = set.iter().map(Clause::kind).collect();
        assert_eq!(kinds, [ClauseKind::Table, ClauseKind::Limit]);
        assert_eq!(set.table(), Some("b"));
        assert_eq!(set.fragment(ClauseKind::Limit), Some("LIMIT 5"));
    }

    #[test]
    fn custom_slots_by_label() {
        let mut set = ClauseSet::new();
        set.insert(Clause::custom("a", true, "one"));
        set.insert(Clause::custom("b", false, "two"));
        set.insert(Clause::custom("c", true, "one"));

        let customs: Vec<_> = set.customs().collect();
        assert_eq!(customs, [("one", "c", true), ("two", "b", false)]);
    }

    #[test]
    fn statement_type_ignores_order() {
        let mut set = ClauseSet::new();
        set.insert(Clause::Params(Payload::from("x")));
        set.insert(Clause::Type(StatementType::Update));
        assert_eq!(set.statement_type(), Some(StatementType::Update));
    }
}
