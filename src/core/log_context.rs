//! Request-scoped context carrying field values
//!
//! This module provides:
//! - `FieldValue`: the value type stored against a `Field`
//! - `Context`: an immutable, cheaply clonable chain of field/value associations

use super::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Value type for structured logging fields
///
/// Equality is by variant and payload: `Int(1)` and `Float(1.0)` differ, and a `NaN`
/// float never equals anything. Exclusion rules rely on this comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
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
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
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

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
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

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

struct Node {
    field: Field,
    value: FieldValue,
    parent: Option<Arc<Node>>,
}

impl Drop for Node {
    // Unlink uniquely owned ancestors one at a time so long chains do not recurse
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            parent = match Arc::try_unwrap(node) {
                Ok(mut owned) => owned.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// Immutable set of field values travelling with a request.
///
/// `with_value` never touches the receiver: it returns a new context layered on top of
/// it, so a context handed to the logger is only ever read. Later layers shadow earlier
/// values for the same field.
///
/// # Example
///
/// ```
/// use rust_context_logger::{Context, Field, FieldValue};
///
/// const REQUEST_ID: Field = Field::from_static("request_id");
///
/// let base = Context::background();
/// let ctx = base.with_value(REQUEST_ID, "req-42");
///
/// assert_eq!(ctx.value(&REQUEST_ID), Some(&FieldValue::from("req-42")));
/// assert!(base.value(&REQUEST_ID).is_none());
/// ```
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Create an empty context
    pub fn background() -> Self {
        Self { head: None }
    }

    /// Return a new context with `field` set to `value` on top of this one
    #[must_use]
    pub fn with_value<F, V>(&self, field: F, value: V) -> Self
    where
        F: Into<Field>,
        V: Into<FieldValue>,
    {
        Self {
            head: Some(Arc::new(Node {
                field: field.into(),
                value: value.into(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Look up the innermost value stored for `field`
    pub fn value(&self, field: &Field) -> Option<&FieldValue> {
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if current.field == *field {
                return Some(&current.value);
            }
            node = current.parent.as_deref();
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Visible field/value pairs, innermost first, shadowed values omitted
    pub fn entries(&self) -> Vec<(&Field, &FieldValue)> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(current) = node {
            if seen.insert(&current.field) {
                entries.push((&current.field, &current.value));
            }
            node = current.parent.as_deref();
        }
        entries
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().into_iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}
