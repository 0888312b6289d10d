//! # Value Type Tags
//!
//! Runtime type classification for `serde_json::Value`.
//!
//! ## Exactness Invariant
//!
//! A value has exactly one [`TypeTag`]. Matching a tag is equality on that
//! classification, never a subtype test: `true` is not an `Int`, `1` is not a
//! `Float`, and `1.0` is not an `Int`. Boolean/integer aliasing is a classic
//! validation bug and this module makes it unrepresentable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The runtime type of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// The null value.
    Null,
    /// `true` or `false`.
    Bool,
    /// A number representable as `i64` or `u64`.
    Int,
    /// Any other number.
    Float,
    /// A string.
    Str,
    /// An ordered sequence.
    List,
    /// A key/value mapping.
    Dict,
}

impl TypeTag {
    /// All tags in declaration order.
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Str,
        TypeTag::List,
        TypeTag::Dict,
    ];

    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => TypeTag::Int,
            Value::Number(_) => TypeTag::Float,
            Value::String(_) => TypeTag::Str,
            Value::Array(_) => TypeTag::List,
            Value::Object(_) => TypeTag::Dict,
        }
    }

    /// Returns true if `value` is classified exactly as this tag.
    pub fn matches(self, value: &Value) -> bool {
        TypeTag::of(value) == self
    }

    /// The lowercase name used in diagnostics and schema documents.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Dict => "dict",
        }
    }

    /// The zero value of this type, used when synthesizing examples.
    pub fn zero(self) -> Value {
        match self {
            TypeTag::Null => Value::Null,
            TypeTag::Bool => Value::Bool(false),
            TypeTag::Int => Value::from(0),
            TypeTag::Float => Value::from(0.0),
            TypeTag::Str => Value::String(String::new()),
            TypeTag::List => Value::Array(Vec::new()),
            TypeTag::Dict => Value::Object(serde_json::Map::new()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown type name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown type tag '{0}'")]
pub struct UnknownTypeTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    /// Accepts the canonical names plus the common long forms
    /// (`boolean`, `integer`, `number`, `string`, `array`, `object`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(TypeTag::Null),
            "bool" | "boolean" => Ok(TypeTag::Bool),
            "int" | "integer" => Ok(TypeTag::Int),
            "float" | "number" => Ok(TypeTag::Float),
            "str" | "string" => Ok(TypeTag::Str),
            "list" | "array" => Ok(TypeTag::List),
            "dict" | "object" => Ok(TypeTag::Dict),
            other => Err(UnknownTypeTag(other.to_string())),
        }
    }
}

/// Returns true for a string made only of whitespace (including the empty string).
///
/// Together with null, blank strings are what trigger a Default schema node.
pub fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(TypeTag::of(&json!(null)), TypeTag::Null);
        assert_eq!(TypeTag::of(&json!(true)), TypeTag::Bool);
        assert_eq!(TypeTag::of(&json!(5)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(-5)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(u64::MAX)), TypeTag::Int);
        assert_eq!(TypeTag::of(&json!(5.0)), TypeTag::Float);
        assert_eq!(TypeTag::of(&json!("s")), TypeTag::Str);
    }

    #[test]
    fn test_classify_containers() {
        assert_eq!(TypeTag::of(&json!([1, 2])), TypeTag::List);
        assert_eq!(TypeTag::of(&json!({"a": 1})), TypeTag::Dict);
    }

    #[test]
    fn test_bool_is_never_int() {
        assert!(!TypeTag::Int.matches(&json!(true)));
        assert!(!TypeTag::Int.matches(&json!(false)));
        assert!(!TypeTag::Bool.matches(&json!(1)));
    }

    #[test]
    fn test_float_is_never_int() {
        assert!(!TypeTag::Int.matches(&json!(5.0)));
        assert!(!TypeTag::Float.matches(&json!(5)));
    }

    #[test]
    fn test_zero_values_match_their_tag() {
        for tag in TypeTag::ALL {
            assert!(tag.matches(&tag.zero()), "zero of {tag} does not match {tag}");
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("int".parse::<TypeTag>(), Ok(TypeTag::Int));
        assert_eq!("string".parse::<TypeTag>(), Ok(TypeTag::Str));
        assert_eq!("object".parse::<TypeTag>(), Ok(TypeTag::Dict));
        let err = "tuple".parse::<TypeTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown type tag 'tuple'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.to_string().parse::<TypeTag>(), Ok(tag));
        }
    }

    #[test]
    fn test_blank_strings() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("  \t\n")));
        assert!(!is_blank(&json!(" x ")));
        assert!(!is_blank(&json!(null)));
        assert!(!is_blank(&json!(0)));
    }
}
