//! Weakly typed field values
//!
//! Every field an entity exposes to the filter engine is read as a [`Value`].
//! Values carry two relations the engine relies on:
//! - natural equality ([`Value::natural_eq`]): same-variant equality, with
//!   integers and floats comparing numerically
//! - natural ordering ([`Value::natural_cmp`]): defined within numerics, text,
//!   timestamps and booleans; undefined across those groups and for
//!   `Null` and `List`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// A field value read from (or written to) an entity
///
/// # Examples
///
/// ```
/// use memrepo_core::Value;
///
/// let weight = Value::from(12);
/// let name = Value::from("Vasya");
/// let missing = Value::from(None::<String>);
///
/// assert!(weight.natural_eq(&Value::from(12.0)));
/// assert!(name.natural_cmp(&Value::from("Alisa")).unwrap().is_gt());
/// assert!(missing.is_null());
/// ```
///
/// # Serialization
///
/// Values serialize untagged so filter sets read naturally as JSON. On input,
/// an RFC 3339 string deserializes as a `Timestamp`; any other string is `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Point in time (UTC)
    Timestamp(DateTime<Utc>),
    /// UTF-8 text
    Text(String),
    /// Sequence of values, used as the candidate list of an `In` filter
    List(Vec<Value>),
}

impl Value {
    /// Check whether this is the null sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the runtime type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Timestamp(_) => "timestamp",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    /// Natural equality
    ///
    /// `Int` and `Float` compare numerically with each other; a NaN equals
    /// itself. `Null` equals only `Null`. Lists are equal when they have the
    /// same length and are element-wise naturally equal.
    pub fn natural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => cmp_f64(*a, *b).is_eq(),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                cmp_f64(*a as f64, *b).is_eq()
            }
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.natural_eq(y))
            }
            _ => false,
        }
    }

    /// Natural ordering
    ///
    /// Returns `None` when the two values have no defined ordering: mixed
    /// groups (e.g. a timestamp against a number) and anything involving
    /// `Null` or `List`. Numbers are totally ordered: NaN sorts above every
    /// other number (below, for a negative NaN).
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(cmp_f64(*a, *b)),
            (Value::Int(a), Value::Float(b)) => Some(cmp_f64(*a as f64, *b)),
            (Value::Float(a), Value::Int(b)) => Some(cmp_f64(*a, *b as f64)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Convert into an optional typed value, mapping `Null` to `None`
    ///
    /// Intended for setters of nullable fields:
    ///
    /// ```
    /// use memrepo_core::Value;
    ///
    /// let name: Option<String> = Value::Null.into_option().unwrap();
    /// assert_eq!(name, None);
    /// let name: Option<String> = Value::from("Murka").into_option().unwrap();
    /// assert_eq!(name.as_deref(), Some("Murka"));
    /// ```
    pub fn into_option<T>(self) -> Result<Option<T>, ConversionError>
    where
        T: TryFrom<Value, Error = ConversionError>,
    {
        match self {
            Value::Null => Ok(None),
            other => T::try_from(other).map(Some),
        }
    }

    /// Get the candidate list if this is a `List`
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Numeric order with zeros equal; pairs involving NaN fall back to `total_cmp`
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
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
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// =============================================================================
// Conversions out of Value
// =============================================================================

/// A value had the wrong runtime type for the requested conversion
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("expected {expected}, got {actual}")]
pub struct ConversionError {
    /// Type the conversion wanted
    pub expected: &'static str,
    /// Type the value actually had
    pub actual: &'static str,
}

impl ConversionError {
    fn new(expected: &'static str, value: &Value) -> Self {
        ConversionError {
            expected,
            actual: value.type_name(),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ConversionError::new("bool", &other)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(ConversionError::new("int", &other)),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| ConversionError {
                expected: "int (32-bit)",
                actual: "int",
            }),
            other => Err(ConversionError::new("int", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(ConversionError::new("float", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ConversionError::new("text", &other)),
        }
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = ConversionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Timestamp(t) => Ok(t),
            other => Err(ConversionError::new("timestamp", &other)),
        }
    }
}
