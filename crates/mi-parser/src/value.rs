use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use thiserror::Error;

use crate::lexer::token::quote_scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Tuple,
    Array,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => write!(f, "scalar"),
            ValueKind::Tuple => write!(f, "tuple"),
            ValueKind::Array => write!(f, "array"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Expected a scalar but found a {0}")]
    NotScalar(ValueKind),
    #[error("A scalar has no children")]
    NoChildren,
}

/// A child of a tuple or array. Bare array elements have an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: SmolStr,
    pub value: Value,
}

impl Field {
    pub fn named(name: impl Into<SmolStr>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn unnamed(value: Value) -> Self {
        Self {
            name: SmolStr::default(),
            value,
        }
    }

    #[inline(always)]
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            write!(f, "{}={}", self.name, self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Parsed MI value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Tuple(Vec<Field>),
    Array(Vec<Field>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Tuple(Vec::new())
    }
}

impl Value {
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn as_scalar(&self) -> Result<&str, ValueError> {
        match self {
            Value::Scalar(s) => Ok(s),
            other => Err(ValueError::NotScalar(other.kind())),
        }
    }

    pub fn fields(&self) -> Result<&[Field], ValueError> {
        match self {
            Value::Tuple(fields) | Value::Array(fields) => Ok(fields),
            Value::Scalar(_) => Err(ValueError::NoChildren),
        }
    }

    pub fn len(&self) -> usize {
        self.fields().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a value by dotted path (`"frame.func"`). Every step must be a named
    /// child of a tuple.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let Value::Tuple(fields) = self else {
            return None;
        };

        let (key, rest) = match path.split_once('.') {
            Some((key, rest)) => (key, Some(rest)),
            None => (path, None),
        };

        let child = fields.iter().find(|f| f.name == key).map(|f| &f.value)?;

        match rest {
            Some(rest) => child.get(rest),
            None => Some(child),
        }
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Field> {
        self.fields().ok()?.get(index)
    }

    pub fn lookup_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_scalar().ok()
    }

    pub fn lookup<T: FromStr>(&self, path: &str) -> Option<T> {
        self.lookup_str(path)?.parse().ok()
    }

    /// Renders a tuple or array without its enclosing brackets, as the body of a
    /// record is written on the wire.
    pub fn to_results_string(&self) -> String {
        match self {
            Value::Tuple(fields) | Value::Array(fields) => fields.iter().join(","),
            scalar => scalar.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", quote_scalar(s)),
            Value::Tuple(fields) => write!(f, "{{{}}}", fields.iter().join(",")),
            Value::Array(fields) => write!(f, "[{}]", fields.iter().join(",")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => serializer.serialize_str(s),
            Value::Tuple(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for field in fields {
                    map.serialize_entry(field.name.as_str(), &field.value)?;
                }
                map.end()
            }
            Value::Array(fields) => {
                let mut seq = serializer.serialize_seq(Some(fields.len()))?;
                for field in fields {
                    if field.is_named() {
                        seq.serialize_element(&NamedElement(field))?;
                    } else {
                        seq.serialize_element(&field.value)?;
                    }
                }
                seq.end()
            }
        }
    }
}

struct NamedElement<'a>(&'a Field);

impl Serialize for NamedElement<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0.name.as_str(), &self.0.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn frame() -> Value {
        Value::Tuple(vec![
            Field::named("reason", Value::scalar("breakpoint-hit")),
            Field::named(
                "frame",
                Value::Tuple(vec![
                    Field::named("func", Value::scalar("main")),
                    Field::named("line", Value::scalar("10")),
                    Field::named(
                        "args",
                        Value::Array(vec![Field::unnamed(Value::scalar("argc"))]),
                    ),
                ]),
            ),
        ])
    }

    #[rstest]
    #[case("reason", Some(Value::scalar("breakpoint-hit")))]
    #[case("frame.func", Some(Value::scalar("main")))]
    #[case("frame.line", Some(Value::scalar("10")))]
    #[case("frame.missing", None)]
    #[case("reason.deeper", None)]
    #[case("frame.args.0", None)]
    #[case("", None)]
    fn test_get(#[case] path: &str, #[case] expected: Option<Value>) {
        assert_eq!(frame().get(path).cloned(), expected);
    }

    #[test]
    fn test_lookup_typed() {
        let value = frame();
        assert_eq!(value.lookup::<u32>("frame.line"), Some(10));
        assert_eq!(value.lookup::<u32>("frame.func"), None);
        assert_eq!(value.lookup_str("frame.func"), Some("main"));
    }

    #[test]
    fn test_scalar_has_no_children() {
        let value = Value::scalar("x");
        assert_eq!(value.fields(), Err(ValueError::NoChildren));
        assert_eq!(value.get("x"), None);
        assert!(value.get_by_index(0).is_none());
        assert_eq!(
            frame().as_scalar(),
            Err(ValueError::NotScalar(ValueKind::Tuple))
        );
    }

    #[test]
    fn test_get_by_index() {
        let value = frame();
        assert_eq!(value.get_by_index(0).map(|f| f.name.as_str()), Some("reason"));
        assert!(value.get_by_index(2).is_none());
    }

    #[rstest]
    #[case(Value::scalar("say \"hi\""), r#""say \"hi\"""#)]
    #[case(Value::scalar(r"C:\dir\"), r#""C:\dir\\""#)]
    #[case(Value::default(), "{}")]
    #[case(Value::Array(vec![]), "[]")]
    #[case(frame(), r#"{reason="breakpoint-hit",frame={func="main",line="10",args=["argc"]}}"#)]
    fn test_display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_to_results_string() {
        assert_eq!(
            frame().to_results_string(),
            r#"reason="breakpoint-hit",frame={func="main",line="10",args=["argc"]}"#
        );
    }

    #[test]
    fn test_serialize_json() {
        let value = Value::Tuple(vec![Field::named(
            "stack",
            Value::Array(vec![
                Field::named("frame", Value::Tuple(vec![Field::named("level", Value::scalar("0"))])),
                Field::unnamed(Value::scalar("bare")),
            ]),
        )]);

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"stack":[{"frame":{"level":"0"}},"bare"]}"#
        );
    }
}
