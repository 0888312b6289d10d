//! # Declarative Schema Documents
//!
//! Compiles JSON or YAML documents into [`Schema`] trees, so schemas without
//! custom closures can live in files next to the data they describe.
//!
//! ## Document Forms
//!
//! ```yaml
//! id: { $type: int }
//! name: { $and: [ { $type: str }, { $convert: lower } ] }
//! age:
//!   $or:
//!     - { $type: int }
//!     - { $default: 18 }
//! nickname: null          # must be absent
//! "^x_": true             # key pattern: any value
//! hobbies: [ { $type: str } ]
//! ```
//!
//! Object keys starting with `$` are directives. A directive object carries
//! exactly one key; every other object is a mapping schema.
//!
//! ## Security Invariant
//!
//! Compilation is total over its input: every malformed node is reported as
//! an `invalidSchema` failure located by its document path, before any value
//! is examined. Converters and predicates are resolved by name from a
//! [`Builtins`] registry only; a document cannot introduce code.
//!
//! ## Field Order
//!
//! Document objects are read into `serde_json::Map`, whose keys are sorted.
//! Mapping fields compiled from a document are therefore declared in key
//! order, which is also the key-pattern tie-break order.

use std::path::Path;
use std::str::FromStr;

use conform_core::{ErrorKind, Failure, FailureDetail, FieldPath, TypeTag};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::builtins::Builtins;
use crate::schema::{MappingSchema, Pattern, Schema, Supplier};

/// Error loading or compiling a schema document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document parsed but does not describe a schema.
    #[error("{0}")]
    Malformed(Failure),

    /// The file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    Load {
        /// Path to the file that failed to load.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },
}

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML (a superset of JSON for practical purposes).
    Yaml,
}

impl Format {
    /// `.yaml`/`.yml` are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Format::Yaml,
            _ => Format::Json,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse `text` into a JSON value. `origin` names the source in errors.
pub fn parse_str(text: &str, format: Format, origin: &str) -> Result<Value, DocumentError> {
    let load_error = |reason: String| DocumentError::Load {
        path: origin.to_string(),
        reason,
    };
    match format {
        Format::Json => {
            serde_json::from_str(text).map_err(|e| load_error(format!("invalid JSON: {e}")))
        }
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| load_error(format!("invalid YAML: {e}")))?;
            json_from_yaml(&yaml, &FieldPath::root())
                .map_err(|e| load_error(format!("YAML to JSON conversion failed: {e}")))
        }
    }
}

/// Read a JSON or YAML file, choosing the parser by extension.
pub fn load_value(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Load {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse_str(&content, Format::from_path(path), &path.display().to_string())
}

/// Read and compile a schema document file.
pub fn load_schema(path: &Path, builtins: &Builtins) -> Result<Schema, DocumentError> {
    let document = load_value(path)?;
    let schema = compile(&document, builtins)?;
    tracing::debug!(path = %path.display(), "schema document compiled");
    Ok(schema)
}

/// Convert a parsed YAML tree to JSON, naming the document location of the
/// first node JSON cannot hold. Tags are dropped.
fn json_from_yaml(yaml: &serde_yaml::Value, path: &FieldPath) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    let unsupported = |what: String| {
        let at = if path.is_root() { "document root" } else { path.as_str() };
        format!("{what} at {at}")
    };
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            json_number(n).ok_or_else(|| unsupported(format!("number {n} has no JSON form")))
        }
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| json_from_yaml(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(entries) => entries
            .iter()
            .map(|(k, v)| -> Result<(String, Value), String> {
                let key = scalar_key(k).ok_or_else(|| unsupported("non-scalar map key".into()))?;
                let value = json_from_yaml(v, &path.key(&key))?;
                Ok((key, value))
            })
            .collect::<Result<Map<_, _>, String>>()
            .map(Value::Object),
        Yaml::Tagged(tagged) => json_from_yaml(&tagged.value, path),
    }
}

fn json_number(n: &serde_yaml::Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Value::from(u));
    }
    n.as_f64().and_then(serde_json::Number::from_f64).map(Value::Number)
}

/// Booleans and numbers become their text; JSON keys are strings.
fn scalar_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a parsed document into a schema.
///
/// # Errors
///
/// Returns [`DocumentError::Malformed`] with an `invalidSchema` failure at the
/// first node that is not a schema form.
pub fn compile(document: &Value, builtins: &Builtins) -> Result<Schema, DocumentError> {
    Compiler { builtins }
        .node(document, &FieldPath::root())
        .map_err(DocumentError::Malformed)
}

struct Compiler<'a> {
    builtins: &'a Builtins,
}

fn invalid(path: &FieldPath, node: &Value, cause: impl Into<String>) -> Failure {
    Failure::with_value(ErrorKind::InvalidSchema, path, node).detail(FailureDetail::Cause(cause.into()))
}

impl Compiler<'_> {
    fn node(&self, node: &Value, path: &FieldPath) -> Result<Schema, Failure> {
        match node {
            Value::Bool(true) => Ok(Schema::Any),
            Value::Null => Ok(Schema::Forbidden),
            Value::String(source) => Pattern::new(source)
                .map(Schema::Pattern)
                .map_err(|e| invalid(path, node, e.to_string())),
            Value::Array(items) => match items.as_slice() {
                [element] => Ok(Schema::list(self.node(element, &path.index(0))?)),
                _ => Err(invalid(path, node, "a list schema has exactly one element")),
            },
            Value::Object(map) => {
                if map.keys().any(|k| k.starts_with('$')) {
                    self.directive(map, node, path)
                } else {
                    self.mapping(map, path)
                }
            }
            Value::Bool(false) | Value::Number(_) => {
                Err(invalid(path, node, "not a schema form"))
            }
        }
    }

    fn mapping(&self, map: &Map<String, Value>, path: &FieldPath) -> Result<Schema, Failure> {
        let mut mapping = MappingSchema::new();
        for (key, value) in map {
            mapping = mapping.field(key.as_str(), self.node(value, &path.key(key))?);
        }
        Ok(mapping.into())
    }

    fn directive(
        &self,
        map: &Map<String, Value>,
        node: &Value,
        path: &FieldPath,
    ) -> Result<Schema, Failure> {
        let mut entries = map.iter();
        let (name, arg) = match (entries.next(), entries.next()) {
            (Some(only), None) => only,
            _ => return Err(invalid(path, node, "a directive must be the only key")),
        };
        let at = path.key(name);

        match name.as_str() {
            "$type" => {
                let tag = arg
                    .as_str()
                    .ok_or_else(|| invalid(&at, arg, "expected a type name"))?;
                TypeTag::from_str(tag)
                    .map(Schema::Type)
                    .map_err(|e| invalid(&at, arg, e.to_string()))
            }
            "$enum" => match arg {
                Value::Array(candidates) => Ok(Schema::Enum(candidates.clone())),
                _ => Err(invalid(&at, arg, "expected a list of candidates")),
            },
            "$and" | "$or" => {
                let Value::Array(members) = arg else {
                    return Err(invalid(&at, arg, "expected a list of schemas"));
                };
                let members = members
                    .iter()
                    .enumerate()
                    .map(|(i, m)| self.node(m, &at.index(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if name == "$and" {
                    Schema::and(members)
                } else {
                    Schema::or(members)
                })
            }
            "$default" => Ok(Schema::Default(Supplier::from(arg.clone()))),
            "$example" => Ok(Schema::Example(Supplier::from(arg.clone()))),
            "$convert" => {
                let converter = arg
                    .as_str()
                    .and_then(|n| self.builtins.converter(n))
                    .ok_or_else(|| invalid(&at, arg, "unknown converter"))?;
                Ok(Schema::Converter(converter.clone()))
            }
            "$check" => {
                let predicate = arg
                    .as_str()
                    .and_then(|n| self.builtins.predicate(n))
                    .ok_or_else(|| invalid(&at, arg, "unknown predicate"))?;
                Ok(Schema::Predicate(predicate.clone()))
            }
            _ => Err(invalid(path, node, format!("unknown directive {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::options::Options;
    use serde_json::json;

    fn compiled(doc: Value) -> Schema {
        compile(&doc, &Builtins::standard()).unwrap()
    }

    fn rejected(doc: Value) -> Failure {
        match compile(&doc, &Builtins::standard()) {
            Err(DocumentError::Malformed(f)) => f,
            other => panic!("expected a malformed document, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_forms() {
        assert!(matches!(compiled(json!(true)), Schema::Any));
        assert!(matches!(compiled(json!(null)), Schema::Forbidden));
        assert!(matches!(compiled(json!("^a")), Schema::Pattern(_)));
        assert!(matches!(compiled(json!({"$type": "int"})), Schema::Type(TypeTag::Int)));
        assert!(matches!(compiled(json!({"$type": "string"})), Schema::Type(TypeTag::Str)));
        assert!(matches!(compiled(json!({"$enum": [1, 2]})), Schema::Enum(_)));
        assert!(matches!(compiled(json!({"$default": 3})), Schema::Default(_)));
        assert!(matches!(compiled(json!({"$example": 3})), Schema::Example(_)));
        assert!(matches!(compiled(json!({"$convert": "lower"})), Schema::Converter(_)));
        assert!(matches!(compiled(json!({"$check": "positive"})), Schema::Predicate(_)));
    }

    #[test]
    fn test_composite_forms() {
        assert!(matches!(compiled(json!([{"$type": "int"}])), Schema::Sequence(_)));
        let s = compiled(json!({"$or": [{"$type": "int"}, null]}));
        assert!(s.admits_absence());
        let Schema::Mapping(m) = compiled(json!({"id": true, "^x_": null})) else {
            panic!("expected a mapping");
        };
        assert_eq!(m.len(), 2);
        assert!(m.has_key_patterns());
    }

    #[test]
    fn test_compiled_schema_normalizes() {
        let s = compiled(json!({
            "name": {"$and": [{"$type": "str"}, {"$convert": "upper"}]},
            "age": {"$or": [{"$type": "int"}, {"$default": 18}]},
        }));
        let out = api::normalize(&json!({"name": "tom"}), &s, &Options::default()).unwrap();
        assert_eq!(out, json!({"name": "TOM", "age": 18}));
    }

    #[test]
    fn test_rejections_are_located() {
        let f = rejected(json!({"a": {"$or": [{"$type": "int"}, 5]}}));
        assert_eq!(f.kind, ErrorKind::InvalidSchema);
        assert_eq!(f.path.as_str(), ".a.$or[1]");
        assert_eq!(f.value, Some(json!(5)));

        assert_eq!(rejected(json!(false)).kind, ErrorKind::InvalidSchema);
        assert_eq!(rejected(json!([1, 2])).path.as_str(), "");
        assert_eq!(rejected(json!(["("])).path.as_str(), "[0]");
    }

    #[test]
    fn test_bad_directives() {
        let f = rejected(json!({"$type": "int", "x": true}));
        assert!(f.message().contains("a directive must be the only key"));
        let f = rejected(json!({"$regex": "x"}));
        assert!(f.message().contains("unknown directive $regex"));
        let f = rejected(json!({"$type": "decimal"}));
        assert_eq!(f.path.as_str(), ".$type");
        assert!(rejected(json!({"$convert": "reverse"})).message().contains("unknown converter"));
        assert!(rejected(json!({"$check": 1})).message().contains("unknown predicate"));
        assert!(rejected(json!({"$and": {"a": 1}})).message().contains("expected a list"));
    }

    #[test]
    fn test_custom_builtins_resolve() {
        let mut b = Builtins::standard();
        b.register_predicate(crate::schema::Predicate::new("even", |v| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        }));
        let s = compile(&json!({"$check": "even"}), &b).unwrap();
        assert!(api::validate(&json!(4), &s, &Options::default()).unwrap().is_pass());
    }

    #[test]
    fn test_yaml_parse_matches_json() {
        let yaml = "id: { $type: int }\ntags: [ { $type: str } ]\n";
        let json_text = r#"{"id": {"$type": "int"}, "tags": [{"$type": "str"}]}"#;
        assert_eq!(
            parse_str(yaml, Format::Yaml, "inline").unwrap(),
            parse_str(json_text, Format::Json, "inline").unwrap()
        );
    }

    #[test]
    fn test_yaml_non_string_keys() {
        let v = parse_str("1: a\ntrue: b\n", Format::Yaml, "inline").unwrap();
        assert_eq!(v, json!({"1": "a", "true": "b"}));
    }

    #[test]
    fn test_yaml_unsupported_nodes_are_located() {
        let err = parse_str("a:\n  b:\n    ? [1, 2]\n    : x\n", Format::Yaml, "inline").unwrap_err();
        assert!(err.to_string().contains("non-scalar map key at .a.b"), "{err}");

        let err = parse_str("xs: [1, .nan]\n", Format::Yaml, "inline").unwrap_err();
        assert!(err.to_string().contains("has no JSON form at .xs[1]"), "{err}");

        let err = parse_str("? [a]\n: b\n", Format::Yaml, "inline").unwrap_err();
        assert!(err.to_string().contains("at document root"), "{err}");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("schema.yaml");
        std::fs::write(&yaml, "id: { $type: int }\n").unwrap();
        let s = load_schema(&yaml, &Builtins::standard()).unwrap();
        assert!(api::validate(&json!({"id": 1}), &s, &Options::default()).unwrap().is_pass());

        let json_path = dir.path().join("schema.json");
        std::fs::write(&json_path, "id: 1").unwrap();
        assert!(matches!(
            load_schema(&json_path, &Builtins::standard()),
            Err(DocumentError::Load { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_value(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read file"));
    }
}
