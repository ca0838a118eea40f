//! Runtime values and their SQL text forms.
//!
//! Values are interpolated into the statement text, not bound as parameters.
//! [`Value::to_literal`] quotes and escapes strings, but it is no substitute
//! for bound parameters: callers must sanitize untrusted input before it
//! reaches a [`Statement`](crate::Statement), otherwise the compiled SQL is
//! open to injection. WHERE values are rendered with [`Value::to_raw`] and are
//! not escaped at all.

use serde::Serialize;
use std::fmt;

/// A value that can appear in a row, a SET list or a WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Quoted, escaped text
    Text(String),
    /// Structured object or array, rendered as quoted JSON
    Json(serde_json::Value),
    /// Left unconverted (e.g. `NOW()` or `DEFAULT`)
    Raw(String),
}

impl Value {
    /// Create a raw, unconverted value.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Serialize any `serde` value into a [`Value`].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::from)
    }

    /// Render the value as an SQL literal for INSERT rows and UPDATE SET lists.
    ///
    /// | value | output |
    /// |---|---|
    /// | `Text` | single-quoted, escaped |
    /// | `Null` | `null` |
    /// | `Bool` | `true` / `false` |
    /// | `Int` / `Float` | the number, unquoted |
    /// | `Json` | compact JSON, single-quoted, `'` and `\` escaped |
    /// | `Raw` | unchanged |
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => float_text(*f),
            Self::Text(s) => format!("'{}'", escape_text(s)),
            Self::Json(json) => format!("'{}'", escape_quoted(&json.to_string())),
            Self::Raw(sql) => sql.clone(),
        }
    }

    /// Render the value without quoting or escaping (WHERE values, select columns).
    ///
    /// Structured values come out as compact JSON, unquoted.
    pub fn to_raw(&self) -> String {
        match self {
            Self::Text(s) | Self::Raw(s) => s.clone(),
            Self::Json(json) => json.to_string(),
            other => other.to_literal(),
        }
    }

    /// Convert into a `serde_json::Value` (used when a list is nested in a row).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) | Self::Raw(s) => serde_json::Value::String(s.clone()),
            Self::Json(json) => json.clone(),
        }
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

fn float_text(f: f64) -> String {
    if f.is_finite() {
        f.to_string()
    } else {
        "null".to_string()
    }
}

/// Escape text for a single-quoted literal.
///
/// Quotes and backslashes are backslash-escaped; the remaining HTML specials
/// are entity-encoded.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape only what can close a single-quoted literal. JSON keeps its `"`.
fn escape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Json(serde_json::Value::Array(
            items.into_iter().map(|v| v.into().to_json()).collect(),
        ))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if n.is_u64() {
                    Self::Raw(n.to_string())
                } else {
                    n.as_f64().map_or_else(|| Self::Raw(n.to_string()), Self::Float)
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

/// An ordered column → value mapping.
///
/// Keys keep first-insertion order; setting an existing key replaces its value
/// in place. A key made only of ASCII digits is an ordinal key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a column value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Append a bare fragment under the next ordinal key.
    pub fn push_bare(&mut self, fragment: impl Into<String>) -> &mut Self {
        let next = self.entries.iter().filter(|(k, _)| is_ordinal(k)).count();
        self.set(next.to_string(), Value::Raw(fragment.into()))
    }

    /// Look up a column value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the record holds `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Column names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a key is a pure ordinal index.
pub(crate) fn is_ordinal(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Record {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_table() {
        assert_eq!(Value::Null.to_literal(), "null");
        assert_eq!(Value::Bool(true).to_literal(), "true");
        assert_eq!(Value::Bool(false).to_literal(), "false");
        assert_eq!(Value::Int(-42).to_literal(), "-42");
        assert_eq!(Value::Float(2.5).to_literal(), "2.5");
        assert_eq!(Value::from("bob").to_literal(), "'bob'");
        assert_eq!(Value::from(json!({"a": 1})).to_literal(), r#"'{"a":1}'"#);
        assert_eq!(Value::raw("NOW()").to_literal(), "NOW()");
    }

    #[test]
    fn text_escaping() {
        assert_eq!(Value::from("O'Brien").to_literal(), r"'O\'Brien'");
        assert_eq!(Value::from(r"a\b").to_literal(), r"'a\\b'");
        assert_eq!(
            Value::from(r#"<b>"x" & y</b>"#).to_literal(),
            "'&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;'"
        );
    }

    #[test]
    fn injection_attempt_stays_inside_the_literal() {
        let literal = Value::from("'; DROP TABLE users; --").to_literal();
        assert_eq!(literal, r"'\'; DROP TABLE users; --'");
    }

    #[test]
    fn json_literals_escape_quotes_and_backslashes() {
        let meta = Value::from(json!({"n": "it's"}));
        assert_eq!(meta.to_literal(), r#"'{"n":"it\'s"}'"#);

        // serde_json escapes the inner quote; the backslash is doubled again
        let quoted = Value::from(json!(["say \"hi\""]));
        assert_eq!(quoted.to_literal(), r#"'["say \\"hi\\""]'"#);

        let literal = Value::from(json!({"x": "'); DROP TABLE t; --"})).to_literal();
        assert_eq!(literal.matches('\'').count() - literal.matches("\\'").count(), 2);
    }

    #[test]
    fn non_finite_floats_render_null() {
        assert_eq!(Value::Float(f64::NAN).to_literal(), "null");
        assert_eq!(Value::Float(f64::INFINITY).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn raw_rendering_skips_quotes() {
        assert_eq!(Value::from("age > 18").to_raw(), "age > 18");
        assert_eq!(Value::Int(5).to_raw(), "5");
        assert_eq!(Value::Null.to_raw(), "null");
        assert_eq!(Value::from(json!(["a"])).to_raw(), r#"["a"]"#);
        assert_eq!(Value::from(json!({"k": 1})).to_raw(), r#"{"k":1}"#);
    }

    #[test]
    fn lists_become_json() {
        let tags = Value::from(vec!["x", "y"]);
        assert_eq!(tags.to_literal(), r#"'["x","y"]'"#);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn json_numbers_keep_their_tag() {
        assert_eq!(Value::from(json!(7)), Value::Int(7));
        assert_eq!(Value::from(json!(1.25)), Value::Float(1.25));
        assert_eq!(Value::from(json!(u64::MAX)).to_literal(), u64::MAX.to_string());
    }

    #[test]
    fn record_overwrites_in_place() {
        let mut r = Record::new().with("a", 1).with("b", 2);
        r.set("a", 3);
        assert_eq!(r.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(r.get("a"), Some(&Value::Int(3)));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn push_bare_uses_ordinal_keys() {
        let mut r = Record::new();
        r.push_bare("age > 18").set("id", 5);
        r.push_bare("active = 1");
        assert_eq!(r.keys().collect::<Vec<_>>(), ["0", "id", "1"]);
        assert!(is_ordinal("0"));
        assert!(!is_ordinal("id"));
        assert!(!is_ordinal(""));
    }
}
