//! Structured fields and per-call context
//!
//! This module provides:
//! - `FieldValue`: Tagged attribute value
//! - `Fields`: Ordered attribute map
//! - `LogContext`: Immutable per-call context carrying an optional field-set
//! - `resolve`: Merge of logger defaults with context fields

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Key under which a context carries its attached field-set
pub const FIELDS_KEY: &str = "applogger_fields";

/// Attribute map; keys serialize in sorted order
pub type Fields = BTreeMap<String, FieldValue>;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(Fields),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::List(_) | FieldValue::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl FieldValue {
    /// Borrow the nested map, if this value is one
    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            FieldValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Convert to serde_json::Value
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json_value).collect())
            }
            FieldValue::Map(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Fields> for FieldValue {
    fn from(fields: Fields) -> Self {
        FieldValue::Map(fields)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Per-call context handed to every logging operation
///
/// A context is an immutable bag of named values. Deriving a new context
/// (`with_value`, `with_fields`) never changes the receiver, so one context
/// can be shared across threads and calls freely.
///
/// At most one field-set is attached, under [`FIELDS_KEY`]. Only that set is
/// turned into entry attributes; other values are carried but not logged.
///
/// # Example
///
/// ```
/// use ndjson_logger::{fields, LogContext};
///
/// let ctx = LogContext::background()
///     .with_fields(fields! { "request_id" => "req-42", "user_id" => 7 });
///
/// assert_eq!(ctx.fields().len(), 2);
/// assert!(LogContext::background().fields().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    values: Arc<BTreeMap<String, FieldValue>>,
}

impl LogContext {
    /// Empty context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value` under `key`
    pub fn with_value<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut values = (*self.values).clone();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(values),
        }
    }

    /// Derive a context whose attached field-set is the current one overlaid
    /// by `extra`
    pub fn with_fields(&self, extra: Fields) -> Self {
        let mut attached = self.fields();
        attached.extend(extra);
        self.with_value(FIELDS_KEY, FieldValue::Map(attached))
    }

    /// Look up a raw value
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// The attached field-set, or an empty set when none is attached
    pub fn fields(&self) -> Fields {
        self.value(FIELDS_KEY)
            .and_then(FieldValue::as_map)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if the context carries no values at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Merge logger defaults with the fields carried by `context`.
///
/// Context fields win on key collision. A missing context contributes nothing.
pub fn resolve(defaults: &Fields, context: Option<&LogContext>) -> Fields {
    let mut merged = defaults.clone();
    if let Some(attached) = context
        .and_then(|ctx| ctx.value(FIELDS_KEY))
        .and_then(FieldValue::as_map)
    {
        for (key, value) in attached {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    #[test]
    fn test_background_is_empty() {
        let ctx = LogContext::background();
        assert!(ctx.is_empty());
        assert!(ctx.fields().is_empty());
    }

    #[test]
    fn test_context_wins_on_collision() {
        let defaults = fields! { "a" => 1, "b" => 2 };
        let ctx = LogContext::background().with_fields(fields! { "b" => 3, "c" => 4 });

        let merged = resolve(&defaults, Some(&ctx));
        assert_eq!(merged, fields! { "a" => 1, "b" => 3, "c" => 4 });
    }

    #[test]
    fn test_missing_context_contributes_nothing() {
        let defaults = fields! { "service" => "api" };
        assert_eq!(resolve(&defaults, None), defaults);
        assert_eq!(resolve(&defaults, Some(&LogContext::background())), defaults);
    }

    #[test]
    fn test_non_map_marker_is_ignored() {
        let ctx = LogContext::background().with_value(FIELDS_KEY, "not a map");
        assert!(ctx.fields().is_empty());
        assert!(resolve(&Fields::new(), Some(&ctx)).is_empty());
    }

    #[test]
    fn test_other_values_are_not_attributes() {
        let ctx = LogContext::background()
            .with_value("user_id", "1234")
            .with_fields(fields! { "request_id" => "r-1" });

        assert_eq!(ctx.value("user_id"), Some(&FieldValue::from("1234")));
        let merged = resolve(&Fields::new(), Some(&ctx));
        assert_eq!(merged.len(), 1);
        assert!(merged.contains_key("request_id"));
    }

    #[test]
    fn test_with_fields_does_not_mutate_parent() {
        let parent = LogContext::background().with_fields(fields! { "x" => 1 });
        let child = parent.with_fields(fields! { "x" => 2, "y" => 3 });

        assert_eq!(parent.fields(), fields! { "x" => 1 });
        assert_eq!(child.fields(), fields! { "x" => 2, "y" => 3 });
    }

    #[test]
    fn test_resolve_does_not_mutate_defaults() {
        let defaults = fields! { "a" => 1 };
        let ctx = LogContext::background().with_fields(fields! { "a" => 9 });
        let _ = resolve(&defaults, Some(&ctx));
        assert_eq!(defaults.get("a"), Some(&FieldValue::Int(1)));
    }

    #[test]
    fn test_nested_values_serialize() {
        let value = FieldValue::from(fields! {
            "tags" => vec!["a", "b"],
            "limits" => fields! { "max" => 10, "ratio" => 0.5 },
            "missing" => None::<i64>,
        });
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            json,
            r#"{"limits":{"max":10,"ratio":0.5},"missing":null,"tags":["a","b"]}"#
        );
        assert_eq!(value.to_json_value(), serde_json::from_str::<serde_json::Value>(&json).unwrap());
    }

    #[test]
    fn test_from_json_value() {
        let raw: serde_json::Value =
            serde_json::from_str(r#"{"n":3,"f":1.5,"s":"x","l":[true,null]}"#).unwrap();
        let value = FieldValue::from(raw);
        let map = value.as_map().unwrap();
        assert_eq!(map["n"], FieldValue::Int(3));
        assert_eq!(map["f"], FieldValue::Float(1.5));
        assert_eq!(map["s"], FieldValue::from("x"));
        assert_eq!(
            map["l"],
            FieldValue::List(vec![FieldValue::Bool(true), FieldValue::Null])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("abc").to_string(), "abc");
        assert_eq!(FieldValue::from(42).to_string(), "42");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::from(vec![1, 2]).to_string(), "[1,2]");
    }
}
