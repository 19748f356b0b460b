//! Element and value model.
//!
//! An [`Element`] is a name/value pair, the atomic operand every condition
//! and entity is built from. A [`Value`] holds a scalar, a nested document,
//! a list, or an unbound placeholder reference.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Document(Vec<Element>),
    /// Named placeholder awaiting a bound value
    Parameter(String),
}

impl Value {
    /// Build a nested document value.
    pub fn document(elements: Vec<Element>) -> Self {
        Value::Document(elements)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Document(_) => "document",
            Value::Parameter(_) => "parameter",
        }
    }

    /// Returns the items when the value is iterable.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Whether this value, or anything nested in it, is an unbound placeholder.
    pub fn has_parameters(&self) -> bool {
        match self {
            Value::Parameter(_) => true,
            Value::List(items) => items.iter().any(Value::has_parameters),
            Value::Document(elements) => elements.iter().any(|e| e.value.has_parameters()),
            _ => false,
        }
    }

    /// Read the value as `T`, converting where a lossless conversion exists.
    pub fn get<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    /// Explicit cast used by `convert(value, type)` in the query language.
    pub fn convert(&self, target: ValueType) -> Result<Value> {
        match target {
            ValueType::Integer => self.get::<i64>().map(Value::Integer),
            ValueType::Float => self.get::<f64>().map(Value::Float),
            ValueType::String => self.get::<String>().map(Value::String),
            ValueType::Boolean => self.get::<bool>().map(Value::Boolean),
        }
    }

    /// Rebuild the value with every nested placeholder passed through `f`.
    pub(crate) fn try_map_parameters<F>(&self, f: &mut F) -> Result<Value>
    where
        F: FnMut(&str) -> Result<Value>,
    {
        match self {
            Value::Parameter(name) => f(name),
            Value::List(items) => items
                .iter()
                .map(|item| item.try_map_parameters(f))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::Document(elements) => elements
                .iter()
                .map(|e| -> Result<Element> {
                    Ok(e.with_value(e.value.try_map_parameters(f)?))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Document),
            other => Ok(other.clone()),
        }
    }

    fn conversion_error(&self, expected: &'static str) -> Error {
        Error::Conversion {
            expected,
            found: format!("{} `{}`", self.type_name(), self),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
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
            Value::Document(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
            Value::Parameter(name) => write!(f, "@{}", name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Document(
                map.into_iter()
                    .map(|(name, value)| Element::new(name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Target of an explicit `convert(value, type)` cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
}

impl ValueType {
    /// Resolve a type name as written in a query, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" | "long" => Some(ValueType::Integer),
            "float" | "double" => Some(ValueType::Float),
            "string" | "text" => Some(ValueType::String),
            "bool" | "boolean" => Some(ValueType::Boolean),
            _ => None,
        }
    }
}

// Floats in [-2^63, 2^63) convert to i64 without saturating
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_F64: f64 = 9_223_372_036_854_775_808.0;

/// Conversion-on-read from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Float(f) if f.fract() == 0.0 && (I64_MIN_F64..I64_MAX_F64).contains(f) => {
                Ok(*f as i64)
            }
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| value.conversion_error("integer")),
            _ => Err(value.conversion_error("integer")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| value.conversion_error("i32"))
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self> {
        let wide = i64::from_value(value)?;
        u64::try_from(wide).map_err(|_| value.conversion_error("u64"))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| value.conversion_error("float")),
            _ => Err(value.conversion_error("float")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(value.conversion_error("boolean")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Boolean(_) | Value::Integer(_) | Value::Float(_) => Ok(value.to_string()),
            _ => Err(value.conversion_error("string")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => Err(value.conversion_error("list")),
        }
    }
}

impl FromValue for Vec<Element> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Document(elements) => Ok(elements.clone()),
            _ => Err(value.conversion_error("document")),
        }
    }
}

/// A name/value pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    name: String,
    value: Value,
}

impl Element {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create an element from anything convertible into a [`Value`].
    pub fn of(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, value.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Read the value as `T`.
    pub fn get<T: FromValue>(&self) -> Result<T> {
        self.value.get()
    }

    pub(crate) fn with_value(&self, value: Value) -> Self {
        Self::new(self.name.clone(), value)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => write!(f, "{}: \"{}\"", self.name, s),
            other => write!(f, "{}: {}", self.name, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_conversion() {
        assert_eq!(Value::from("42").get::<i64>().unwrap(), 42);
        assert_eq!(Value::from(10).get::<f64>().unwrap(), 10.0);
        assert_eq!(Value::from(2.0).get::<i32>().unwrap(), 2);
        assert_eq!(Value::from(7).get::<String>().unwrap(), "7");
        assert!(Value::from("TRUE").get::<bool>().unwrap());
    }

    #[test]
    fn test_conversion_failure_is_an_error() {
        let err = Value::from("Ada").get::<i64>().unwrap_err();
        assert!(matches!(err, Error::Conversion { expected: "integer", .. }));
        assert!(Value::from(-1).get::<u64>().is_err());
        assert!(Value::Null.get::<String>().is_err());
    }

    #[test]
    fn test_out_of_range_float_is_not_an_integer() {
        for f in [1e20, -1e20, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            let err = Value::Float(f).get::<i64>().unwrap_err();
            assert!(matches!(err, Error::Conversion { expected: "integer", .. }), "{}", f);
        }
        assert!(Value::Float(1e20).convert(ValueType::Integer).is_err());
        assert_eq!(Value::Float(-9_223_372_036_854_775_808.0).get::<i64>().unwrap(), i64::MIN);
        assert_eq!(Value::Float(1e15).get::<i64>().unwrap(), 1_000_000_000_000_000);
    }

    #[test]
    fn test_list_reads() {
        let value = Value::from(vec![1, 2, 3]);
        assert!(value.is_iterable());
        assert_eq!(value.get::<Vec<i64>>().unwrap(), vec![1, 2, 3]);
        assert!(Value::from(1).get::<Vec<i64>>().is_err());
    }

    #[test]
    fn test_json_object_keeps_field_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"name": "Ada", "age": 36, "tags": ["x"]}"#).unwrap();
        let value = Value::from(json);
        let elements = value.get::<Vec<Element>>().unwrap();
        let names: Vec<&str> = elements.iter().map(Element::name).collect();
        assert_eq!(names, vec!["name", "age", "tags"]);
        assert_eq!(elements[1].get::<i64>().unwrap(), 36);
    }

    #[test]
    fn test_convert_cast() {
        assert_eq!(
            Value::from("12").convert(ValueType::Integer).unwrap(),
            Value::Integer(12)
        );
        assert_eq!(
            Value::from(3).convert(ValueType::String).unwrap(),
            Value::String("3".to_string())
        );
        assert_eq!(ValueType::from_name("DOUBLE"), Some(ValueType::Float));
        assert_eq!(ValueType::from_name("date"), None);
    }

    #[test]
    fn test_parameters_detected_in_nested_values() {
        let value = Value::List(vec![Value::from(1), Value::Parameter("x".into())]);
        assert!(value.has_parameters());

        let resolved = value
            .try_map_parameters(&mut |_| Ok(Value::from(2)))
            .unwrap();
        assert_eq!(resolved, Value::from(vec![1, 2]));
    }
}
