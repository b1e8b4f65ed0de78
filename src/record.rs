/// StreamGrid Record Types
///
/// Records are schema-free rows: a mapping from field name to a scalar
/// value. The field set may vary between records of the same stream, so
/// lookups return `Option` and absent fields are first-class.
///
/// # Identity
///
/// Every stored record is assigned a `RecordId` by the store: a strictly
/// increasing integer that never changes and is never reused, even across
/// `clear()`. Views and selections track records by id, never by position,
/// so positional churn in the base store cannot dangle them.
///
/// # Canonical string form
///
/// Text search and categorical filters operate on the canonical string
/// form of a value, which is its `Display` output: `true`, `false`, `42`,
/// `1.5`, `null`, or the string itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identity for a record, independent of its position
pub type RecordId = u64;

/// A scalar field value
///
/// Serializes untagged, so records round-trip as plain JSON objects
/// (`{"title": "t", "done": true}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null (distinct from an absent field only in serialization)
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns true for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the value: integers and floats both qualify.
    /// Used by the sort engine so `Int(3)` and `Float(3.5)` compare
    /// numerically rather than by type.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            // Nested arrays/objects keep their JSON text so they stay
            // searchable in the free-text clause
            other => Value::Str(other.to_string()),
        }
    }
}

/// One schema-free row of data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record {
            fields: HashMap::new(),
        }
    }

    /// Builder-style field insertion
    ///
    /// ```
    /// use streamgrid::Record;
    ///
    /// let record = Record::new().with("title", "Drink coffee").with("done", true);
    /// assert_eq!(record.get("title").unwrap().as_str(), Some("Drink coffee"));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a field
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterate over all (field, value) pairs
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert a decoded JSON object into a record
    ///
    /// Returns `None` for non-object JSON; producers deliver records as
    /// objects.
    pub fn from_json(json: serde_json::Value) -> Option<Record> {
        match json {
            serde_json::Value::Object(map) => Some(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}
