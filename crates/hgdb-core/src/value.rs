//! Vertex identifiers and attribute values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::{ErrorInfo, HgdbError};

/// Caller supplied identifier for a vertex.
///
/// Ordering is total: every integer sorts before every string, integers
/// compare numerically and strings lexicographically. The canonical key of a
/// hyperedge is built on this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VertexId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexId::Int(value) => write!(f, "{value}"),
            VertexId::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i32> for VertexId {
    fn from(value: i32) -> Self {
        VertexId::Int(i64::from(value))
    }
}

impl From<u32> for VertexId {
    fn from(value: u32) -> Self {
        VertexId::Int(i64::from(value))
    }
}

impl From<i64> for VertexId {
    fn from(value: i64) -> Self {
        VertexId::Int(value)
    }
}

impl From<&str> for VertexId {
    fn from(value: &str) -> Self {
        VertexId::Text(value.to_owned())
    }
}

impl From<String> for VertexId {
    fn from(value: String) -> Self {
        VertexId::Text(value)
    }
}

impl From<&VertexId> for VertexId {
    fn from(value: &VertexId) -> Self {
        value.clone()
    }
}

/// Open attribute record attached to vertices and hyperedges.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Tagged attribute value restricted to JSON representable shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Absent or explicit null value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    Text(String),
    /// Ordered sequence of values.
    List(Vec<AttrValue>),
    /// Nested mapping with string keys.
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Returns the numeric payload widened to `f64`, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(value) => Some(*value as f64),
            AttrValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Converts the value into its JSON form.
    ///
    /// Fails with [`HgdbError::NonPortableValue`] for NaN and infinite floats,
    /// which JSON cannot express.
    pub fn to_json(&self) -> Result<Value, HgdbError> {
        Ok(match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(value) => Value::Bool(*value),
            AttrValue::Int(value) => Value::Number(Number::from(*value)),
            AttrValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .ok_or_else(|| {
                    HgdbError::NonPortableValue(
                        ErrorInfo::new("non-finite-float", "JSON cannot encode non-finite floats")
                            .with_context("value", value.to_string()),
                    )
                })?,
            AttrValue::Text(value) => Value::String(value.clone()),
            AttrValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(AttrValue::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            AttrValue::Map(entries) => Value::Object(attrs_to_json(entries)?),
        })
    }

    /// Builds a value from its JSON form.
    ///
    /// Integers that fit in `i64` stay integers; every other number becomes a
    /// float.
    pub fn from_json(value: Value) -> AttrValue {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(value) => AttrValue::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => AttrValue::Int(value),
                None => AttrValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(value) => AttrValue::Text(value),
            Value::Array(items) => {
                AttrValue::List(items.into_iter().map(AttrValue::from_json).collect())
            }
            Value::Object(entries) => AttrValue::Map(attrs_from_json(entries)),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        AttrValue::List(value)
    }
}

impl From<Attrs> for AttrValue {
    fn from(value: Attrs) -> Self {
        AttrValue::Map(value)
    }
}

/// Builds an attribute record from key/value pairs.
pub fn attrs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Attrs
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Converts an attribute record into a JSON object.
pub fn attrs_to_json(attrs: &Attrs) -> Result<Map<String, Value>, HgdbError> {
    attrs
        .iter()
        .map(|(key, value)| {
            value
                .to_json()
                .map(|json| (key.clone(), json))
                .map_err(|err| err.with_context("key", key))
        })
        .collect()
}

/// Converts a JSON object into an attribute record.
pub fn attrs_from_json(object: Map<String, Value>) -> Attrs {
    object
        .into_iter()
        .map(|(key, value)| (key, AttrValue::from_json(value)))
        .collect()
}
