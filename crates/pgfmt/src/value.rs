//! Values that can be formatted into SQL.
//!
//! [`Value`] is the closed set of data the formatter understands. Rows used by
//! the bulk helpers are [`Object`]s: ordered maps from property name to value.

use crate::ctf::ToPostgres;
use crate::error::{FormatError, FormatResult};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// An ordered property map (a data row or a named values source).
pub type Object = IndexMap<String, Value>;

/// A value to be rendered as SQL.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact numeric text (big integers, decimals). Validated when formatted.
    Numeric(String),
    Text(String),
    Date(DateTime<Utc>),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(Object),
    Json(serde_json::Value),
    Custom(Arc<dyn ToPostgres>),
}

impl Value {
    /// Wrap a custom-formatted type.
    pub fn custom<T: ToPostgres + 'static>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Binary data, formatted as a `bytea` hex literal.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Build an object value from `(key, value)` pairs, keeping their order.
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert any serializable value through its JSON representation.
    ///
    /// JSON objects become [`Value::Object`] so they can act as named values or rows.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> FormatResult<Self> {
        Ok(Self::from_json(serde_json::to_value(value)?))
    }

    /// Convert a JSON document into a value tree.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    Value::Numeric(n.to_string())
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JSON representation of the value.
    ///
    /// Custom types are resolved first; dates become ISO-8601 strings and
    /// binary data a `\x`-prefixed hex string.
    pub fn to_json(&self) -> FormatResult<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Numeric(s) => serde_json::from_str(s)
                .map_err(|_| FormatError::invalid_value(format!("'{s}' is not a valid number")))?,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Bytes(b) => serde_json::Value::String(format!("\\x{}", hex::encode(b))),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().map(Value::to_json).collect::<FormatResult<_>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), v.to_json()?);
                }
                serde_json::Value::Object(out)
            }
            Value::Json(j) => j.clone(),
            Value::Custom(_) => {
                let (resolved, _) = crate::ctf::resolve(self)?;
                resolved.to_json()?
            }
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Numeric(a), Value::Numeric(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        }
    )*};
}

impl_from_int!(i8, i16, i32, i64, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Numeric(v.to_string()),
        }
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Numeric(v.to_string()),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Numeric(v.to_string())
    }
}

/// Conversion of a record into a data row.
///
/// Implemented by `#[derive(ToRow)]`; serde types can use [`to_row`] instead.
pub trait ToRow {
    fn to_row(&self) -> Object;
}

impl ToRow for Object {
    fn to_row(&self) -> Object {
        self.clone()
    }
}

impl<T: ToRow + ?Sized> ToRow for &T {
    fn to_row(&self) -> Object {
        (**self).to_row()
    }
}

/// Convert a serializable struct into a data row.
pub fn to_row<T: Serialize + ?Sized>(value: &T) -> FormatResult<Object> {
    match Value::from_serialize(value)? {
        Value::Object(row) => Ok(row),
        other => Err(FormatError::invalid_value(format!(
            "expected a struct or map to build a row, got {other:?}"
        ))),
    }
}

/// Build a row from `(key, value)` pairs.
///
/// ```ignore
/// let row = pgfmt::row([("id", Value::from(1)), ("name", "alice".into())]);
/// ```
pub fn row<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Object
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
