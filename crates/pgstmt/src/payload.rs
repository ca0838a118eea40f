//! Clause payloads and shape detection.

use crate::error::StmtResult;
use crate::value::{Record, Value};
use serde::Serialize;

/// What a `params` or `where` clause carries.
///
/// The compiler dispatches on the shape: a [`Payload::Map`] is one row (or a
/// keyed predicate list), [`Payload::Rows`] is a multi-row insert, and
/// [`Payload::Text`] always passes through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw SQL text
    Text(String),
    /// Ordinal list (select columns, bare predicates)
    List(Vec<Value>),
    /// One keyed mapping
    Map(Record),
    /// A list of keyed mappings
    Rows(Vec<Record>),
}

impl Payload {
    /// Detect the shape of a JSON value.
    ///
    /// An array counts as [`Payload::Rows`] only when it is non-empty and every
    /// element is an object.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Null => Self::Text(String::new()),
            serde_json::Value::Object(map) => Self::Map(Record::from(map)),
            serde_json::Value::Array(items) => {
                if !items.is_empty() && items.iter().all(serde_json::Value::is_object) {
                    Self::Rows(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                serde_json::Value::Object(map) => Some(Record::from(map)),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Self::List(items.into_iter().map(Value::from).collect())
                }
            }
            scalar => Self::Text(scalar.to_string()),
        }
    }

    /// Serialize any `serde` value and detect its shape.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> StmtResult<Self> {
        Ok(Self::from_json(serde_json::to_value(value)?))
    }

    /// The payload as a single scalar string, if it is one.
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::List(items) if items.len() == 1 => match &items[0] {
                Value::Json(_) => None,
                v => Some(v.to_raw()),
            },
            _ => None,
        }
    }

    /// Render without any statement-type interpretation.
    pub fn passthrough(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => join_raw(items.iter()),
            Self::Map(record) => assignments(record),
            Self::Rows(rows) => rows.iter().map(assignments).collect::<Vec<_>>().join(","),
        }
    }

    /// Short shape name for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Rows(_) => "rows",
        }
    }
}

pub(crate) fn join_raw<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(Value::to_raw).collect::<Vec<_>>().join(",")
}

fn assignments(record: &Record) -> String {
    record
        .iter()
        .map(|(k, v)| format!("{k} = {}", v.to_raw()))
        .collect::<Vec<_>>()
        .join(",")
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Self::Map(record)
    }
}

impl From<Vec<Record>> for Payload {
    fn from(rows: Vec<Record>) -> Self {
        Self::Rows(rows)
    }
}

impl From<Vec<Value>> for Payload {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Payload {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for Payload {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Payload {
    fn from(items: [&str; N]) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Payload {
    fn from(entries: [(K, V); N]) -> Self {
        Self::Map(Record::from(entries))
    }
}

impl From<serde_json::Value> for Payload {
    fn from(json: serde_json::Value) -> Self {
        Self::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_rows_only_for_arrays_of_objects() {
        assert!(matches!(
            Payload::from(json!([{"a": 1}, {"a": 2}])),
            Payload::Rows(rows) if rows.len() == 2
        ));
        assert!(matches!(Payload::from(json!([])), Payload::List(v) if v.is_empty()));
        assert!(matches!(
            Payload::from(json!([{"a": 1}, "b"])),
            Payload::List(v) if v.len() == 2
        ));
        assert!(matches!(Payload::from(json!({"a": 1})), Payload::Map(_)));
        assert_eq!(Payload::from(json!("x = 1")), Payload::Text("x = 1".into()));
        assert_eq!(Payload::from(json!(10)), Payload::Text("10".into()));
    }

    #[test]
    fn object_keys_keep_declaration_order() {
        let Payload::Map(record) = Payload::from(json!({"zeta": 1, "alpha": 2, "mid": 3})) else {
            panic!("expected a map");
        };
        assert_eq!(record.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn from_serialize_uses_field_order() {
        #[derive(Serialize)]
        struct NewUser<'a> {
            name: &'a str,
            age: Option<i32>,
        }

        let payload = Payload::from_serialize(&NewUser {
            name: "ann",
            age: None,
        })
        .unwrap();
        let Payload::Map(record) = payload else {
            panic!("expected a map");
        };
        assert_eq!(record.keys().collect::<Vec<_>>(), ["name", "age"]);
        assert_eq!(record.get("age"), Some(&Value::Null));
    }

    #[test]
    fn scalar_extraction() {
        assert_eq!(Payload::from("users").as_scalar().as_deref(), Some("users"));
        assert_eq!(
            Payload::List(vec![Value::Int(10)]).as_scalar().as_deref(),
            Some("10")
        );
        assert_eq!(Payload::from(["a", "b"]).as_scalar(), None);
        assert_eq!(Payload::from(json!({"a": 1})).as_scalar(), None);
    }

    #[test]
    fn passthrough_rendering() {
        assert_eq!(Payload::from(["a", "b"]).passthrough(), "a,b");
        assert_eq!(
            Payload::from([("id", 5), ("n", 2)]).passthrough(),
            "id = 5,n = 2"
        );
        assert_eq!(Payload::from("CASCADE").passthrough(), "CASCADE");
    }
}
