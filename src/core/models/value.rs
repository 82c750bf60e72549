//! Resolved field values and the sparse form-value map

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Placeholder shown for a field that has been explicitly left unset.
pub const UNSET: &str = "-";

/// A resolved value for one field.
///
/// Mirrors JSON scalars and lists, plus a `NotANumber` marker produced when
/// integer coercion fails. Serialises back to plain JSON (`NotANumber` as `null`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text
    Text(String),
    /// Number as received or coerced
    Number(Number),
    /// Boolean flag
    Bool(bool),
    /// Result of a failed numeric coercion
    NotANumber,
    /// Multiple values
    List(Vec<FieldValue>),
    /// Structured value passed through untouched
    Object(Map<String, Value>),
}

impl FieldValue {
    /// Convert a JSON value; `null` has no field value
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Array(items) => Some(Self::List(items.iter().filter_map(Self::from_json).collect())),
            Value::Object(map) => Some(Self::Object(map.clone())),
        }
    }

    /// Text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Integer value
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Number(Number::from(value))
    }

    /// List of text values
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| Self::Text(s.into())).collect())
    }

    /// The explicit "unset" placeholder
    #[must_use]
    pub fn unset() -> Self {
        Self::text(UNSET)
    }

    /// Whether this is the explicit "unset" placeholder
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Text(s) if s == UNSET)
    }

    /// Whether the value counts as "having a value" to the portal.
    ///
    /// Empty text, zero, `false` and `NotANumber` do not; lists and objects always do,
    /// even when empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Self::Bool(b) => *b,
            Self::NotANumber => false,
            Self::List(_) | Self::Object(_) => true,
        }
    }

    /// Borrow the text of a `Text` value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form used for display and for comma-splitting; lists join with `,`
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::NotANumber => "NaN".to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(map) => Value::Object(map.clone()).to_string(),
        }
    }

    /// Individual entries: list items, or the comma-separated parts of a scalar
    #[must_use]
    pub fn split_entries(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.iter().map(Self::to_display_string).collect(),
            other if other.is_truthy() => other
                .to_display_string()
                .split(',')
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Sparse map of field name to resolved value, kept in schema order.
///
/// Serialises as a JSON object whose keys follow insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FormValues(IndexMap<String, FieldValue>);

impl FormValues {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(name.into(), value)
    }

    /// Value for a field name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Whether a field produced a value
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Field names in schema order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness_matches_portal_rules() {
        assert!(!FieldValue::text("").is_truthy());
        assert!(!FieldValue::integer(0).is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(!FieldValue::NotANumber.is_truthy());
        assert!(FieldValue::List(Vec::new()).is_truthy());
        assert!(FieldValue::list([""]).is_truthy());
        assert!(FieldValue::text("0").is_truthy());
    }

    #[test]
    fn test_from_json_drops_nested_nulls() {
        let value = FieldValue::from_json(&json!(["a", null, 2])).unwrap();
        assert_eq!(
            value,
            FieldValue::List(vec![FieldValue::text("a"), FieldValue::integer(2)])
        );
        assert!(FieldValue::from_json(&Value::Null).is_none());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::list(["a", "b"]).to_display_string(), "a,b");
        assert_eq!(FieldValue::NotANumber.to_string(), "NaN");
        assert_eq!(FieldValue::integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_split_entries() {
        assert_eq!(FieldValue::text("math,sci").split_entries(), vec!["math", "sci"]);
        assert_eq!(FieldValue::list(["x"]).split_entries(), vec!["x"]);
        assert!(FieldValue::text("").split_entries().is_empty());
    }

    #[test]
    fn test_form_values_keep_insertion_order() {
        let mut values = FormValues::new();
        values.insert("zeta", FieldValue::text("z"));
        values.insert("alpha", FieldValue::text("a"));
        values.insert("zeta", FieldValue::text("z2"));

        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"{"zeta":"z2","alpha":"a"}"#
        );
    }

    #[test]
    fn test_not_a_number_serializes_as_null() {
        let mut values = FormValues::new();
        values.insert("age", FieldValue::NotANumber);
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"{"age":null}"#);
    }
}
