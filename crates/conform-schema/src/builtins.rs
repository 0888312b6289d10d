//! # Built-in Catalog
//!
//! Named converters and predicates that declarative schema documents refer to
//! through `$convert` and `$check`. Callers may register their own under new
//! names, or shadow a standard one.
//!
//! | Converter   | Input                     | Output                    |
//! |-------------|---------------------------|---------------------------|
//! | `lower`     | string                    | lower-cased string        |
//! | `upper`     | string                    | upper-cased string        |
//! | `trim`      | string                    | trimmed string            |
//! | `to_int`    | int, integral float, numeric string | int             |
//! | `to_float`  | number, numeric string    | float                     |
//! | `to_string` | any scalar                | its textual form          |
//!
//! | Predicate      | True for                               |
//! |----------------|----------------------------------------|
//! | `non_empty`    | non-empty string, list or mapping      |
//! | `positive`     | number > 0                             |
//! | `non_negative` | number >= 0                            |

use std::collections::BTreeMap;

use serde_json::Value;

use crate::schema::{BoxError, Converter, Predicate};

/// Registry of named converters and predicates.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    converters: BTreeMap<String, Converter>,
    predicates: BTreeMap<String, Predicate>,
}

impl Builtins {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard catalog.
    pub fn standard() -> Self {
        let mut b = Self::empty();
        b.register_converter(Converter::new("lower", |v| map_str(v, str::to_lowercase)));
        b.register_converter(Converter::new("upper", |v| map_str(v, str::to_uppercase)));
        b.register_converter(Converter::new("trim", |v| map_str(v, |s| s.trim().to_string())));
        b.register_converter(Converter::new("to_int", to_int));
        b.register_converter(Converter::new("to_float", to_float));
        b.register_converter(Converter::new("to_string", to_text));
        b.register_predicate(Predicate::non_empty());
        b.register_predicate(Predicate::new("positive", |v| {
            v.as_f64().is_some_and(|n| n > 0.0)
        }));
        b.register_predicate(Predicate::new("non_negative", |v| {
            v.as_f64().is_some_and(|n| n >= 0.0)
        }));
        b
    }

    /// Register a converter under its own name, replacing any previous one.
    pub fn register_converter(&mut self, converter: Converter) -> &mut Self {
        self.converters.insert(converter.name().to_string(), converter);
        self
    }

    /// Register a predicate under its own name, replacing any previous one.
    pub fn register_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.insert(predicate.name().to_string(), predicate);
        self
    }

    /// Look up a converter.
    pub fn converter(&self, name: &str) -> Option<&Converter> {
        self.converters.get(name)
    }

    /// Look up a predicate.
    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Registered converter names, sorted.
    pub fn converter_names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(String::as_str)
    }

    /// Registered predicate names, sorted.
    pub fn predicate_names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }
}

fn map_str(value: &Value, f: impl Fn(&str) -> String) -> Result<Value, BoxError> {
    match value {
        Value::String(s) => Ok(Value::String(f(s))),
        other => Err(format!("expected a string, got {other}").into()),
    }
}

fn to_int(value: &Value) -> Result<Value, BoxError> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Value::from(f as i64)),
            _ => Err(format!("{n} is not integral").into()),
        },
        Value::String(s) => Ok(Value::from(s.trim().parse::<i64>()?)),
        other => Err(format!("cannot convert {other} to int").into()),
    }
}

fn to_float(value: &Value) -> Result<Value, BoxError> {
    let f = match value {
        Value::Number(n) => n.as_f64().ok_or("number out of range")?,
        Value::String(s) => s.trim().parse::<f64>()?,
        other => return Err(format!("cannot convert {other} to float").into()),
    };
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("{f} is not a finite number").into())
}

fn to_text(value: &Value) -> Result<Value, BoxError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(format!("cannot convert {other} to string").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn convert(name: &str, v: Value) -> Result<Value, String> {
        Builtins::standard()
            .converter(name)
            .unwrap_or_else(|| panic!("missing converter {name}"))
            .apply(&v)
    }

    fn check(name: &str, v: Value) -> bool {
        Builtins::standard()
            .predicate(name)
            .unwrap_or_else(|| panic!("missing predicate {name}"))
            .judge(&v)
    }

    #[test]
    fn test_standard_names() {
        let b = Builtins::standard();
        let converters: Vec<&str> = b.converter_names().collect();
        assert_eq!(converters, ["lower", "to_float", "to_int", "to_string", "trim", "upper"]);
        let predicates: Vec<&str> = b.predicate_names().collect();
        assert_eq!(predicates, ["non_empty", "non_negative", "positive"]);
    }

    #[test]
    fn test_string_converters() {
        assert_eq!(convert("lower", json!("ReAd")).unwrap(), json!("read"));
        assert_eq!(convert("upper", json!("ReAd")).unwrap(), json!("READ"));
        assert_eq!(convert("trim", json!("  x ")).unwrap(), json!("x"));
        assert!(convert("lower", json!(1)).is_err());
    }

    #[test]
    fn test_to_int() {
        assert_eq!(convert("to_int", json!(" 42 ")).unwrap(), json!(42));
        assert_eq!(convert("to_int", json!(7)).unwrap(), json!(7));
        assert_eq!(convert("to_int", json!(3.0)).unwrap(), json!(3));
        assert!(convert("to_int", json!(3.5)).is_err());
        assert!(convert("to_int", json!("abc")).is_err());
        assert!(convert("to_int", json!(null)).is_err());
    }

    #[test]
    fn test_to_float_and_to_string() {
        assert_eq!(convert("to_float", json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(convert("to_float", json!(2)).unwrap(), json!(2.0));
        assert!(convert("to_float", json!("NaN")).is_err());
        assert_eq!(convert("to_string", json!(12)).unwrap(), json!("12"));
        assert_eq!(convert("to_string", json!(true)).unwrap(), json!("true"));
        assert!(convert("to_string", json!([1])).is_err());
    }

    #[test]
    fn test_predicates() {
        assert!(check("positive", json!(1)));
        assert!(!check("positive", json!(0)));
        assert!(check("non_negative", json!(0)));
        assert!(!check("non_negative", json!("1")));
        assert!(check("non_empty", json!([0])));
        assert!(Builtins::standard().predicate("non_empty").unwrap().is_non_empty());
    }

    #[test]
    fn test_register_shadows_standard() {
        let mut b = Builtins::standard();
        b.register_converter(Converter::map("lower", |_| json!("shadowed")));
        assert_eq!(b.converter("lower").unwrap().apply(&json!("A")).unwrap(), json!("shadowed"));
    }
}
