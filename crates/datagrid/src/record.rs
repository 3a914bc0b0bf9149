//! Records and scalar values.
//!
//! A [`Record`] is an opaque map from field name to a scalar [`Value`]. The
//! table never mutates records; derived views refer to them by index.
//!
//! # Example
//!
//! ```rust
//! use datagrid::record::{Record, Value};
//!
//! let r = Record::new()
//!     .with("id", 7)
//!     .with("name", "Alice")
//!     .with("score", 9.5);
//!
//! assert_eq!(r.text("id").as_deref(), Some("7"));
//! assert_eq!(r.text("score").as_deref(), Some("9.5"));
//! assert_eq!(r.get("missing"), None);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Any number. Integers are stored as `f64`.
    Number(f64),
    /// Text.
    Text(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string form used for display, search, filter and
    /// identifiers. Null has no string form.
    #[must_use]
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::Text(s) => Some(Cow::Borrowed(s)),
        }
    }
}

/// Integral values print without a fractional part; `-0` prints as `0`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            // Nested structures are kept as their compact JSON text.
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(other.to_string())
            }
        }
    }
}

/// One data row: field name to scalar value.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the string form of a field. Absent and null fields yield `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.fields.get(key).and_then(Value::to_text)
    }

    /// Returns the normalized identifier stored under `id_field`.
    #[must_use]
    pub fn id(&self, id_field: &str) -> Option<String> {
        self.text(id_field).map(Cow::into_owned)
    }

    /// Iterates over fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Converts an arbitrary JSON value into records.
///
/// Anything that is not an array becomes an empty collection. Array elements
/// that are not objects are skipped.
#[must_use]
pub fn records_from_value(value: serde_json::Value) -> Vec<Record> {
    let serde_json::Value::Array(items) = value else {
        warn!("Record input is not an array, treating it as empty");
        return Vec::new();
    };

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::Object(map) => Some(Record::from(map)),
            _ => None,
        })
        .collect();

    if records.len() < total {
        warn!(
            "Skipped {} non-object entries in record input",
            total - records.len()
        );
    }
    records
}

/// Parses a JSON document into records, coercing non-array documents to an
/// empty collection.
///
/// # Errors
///
/// Returns [`DatagridError::InvalidJson`](crate::DatagridError::InvalidJson)
/// when the text is not valid JSON.
pub fn records_from_json(json: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(records_from_value(value))
}
