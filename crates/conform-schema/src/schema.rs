//! # Schema Algebra
//!
//! A [`Schema`] is a closed, recursive description of allowed value shapes.
//! Every node kind has its own constructor, so the matcher dispatches with one
//! exhaustive `match` instead of inspecting runtime shapes.
//!
//! ## Invariants
//!
//! - Schemas are immutable once built. The matcher and the synthesizer only
//!   ever borrow them.
//! - Closures (predicates, converters, lazy suppliers) are shared through
//!   `Arc`, so cloning a schema is cheap and schemas are `Send + Sync`.
//! - Mapping fields keep declaration order. That order is the tie-break when
//!   several key patterns match the same input key.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use conform_core::{ConformError, ErrorKind, Failure, FailureDetail, FieldPath, TypeTag};
use regex::Regex;
use serde_json::Value;

/// Error type converters may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type JudgeFn = dyn Fn(&Value) -> bool + Send + Sync;
type ConvertFn = dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync;
type SupplyFn = dyn Fn() -> Value + Send + Sync;

/// A schema node.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Matches everything, no rewrite.
    Any,
    /// Must be absent. Fails whenever it is evaluated against a present value.
    Forbidden,
    /// Exact runtime type.
    Type(TypeTag),
    /// A string matching a regular expression from its start.
    Pattern(Pattern),
    /// One of a fixed set of literals, in declaration order.
    Enum(Vec<Value>),
    /// A judging function.
    Predicate(Predicate),
    /// All terms, left to right, threading the normalized value.
    And(Vec<Schema>),
    /// First branch that accepts the original value. A branch that fails for
    /// any reason, schema defects included, is only a rejected branch.
    Or(Vec<Schema>),
    /// A mapping with declared fields.
    Mapping(MappingSchema),
    /// A sequence whose every element matches the element schema.
    Sequence(Box<Schema>),
    /// Unconditional rewrite.
    Converter(Converter),
    /// Replacement for a null or blank value.
    Default(Supplier),
    /// Sample value, consulted only during synthesis.
    Example(Supplier),
}

impl Schema {
    /// Exact type tag.
    pub fn of(tag: TypeTag) -> Self {
        Schema::Type(tag)
    }

    /// Regular-expression node.
    ///
    /// # Errors
    ///
    /// Returns an `invalidSchema` error if `source` does not compile.
    pub fn pattern(source: &str) -> Result<Self, ConformError> {
        Pattern::new(source).map(Schema::Pattern).map_err(|e| {
            Failure::with_value(ErrorKind::InvalidSchema, &FieldPath::root(), &Value::from(source))
                .detail(FailureDetail::Cause(e.to_string()))
                .into()
        })
    }

    /// Enum of literal candidates.
    pub fn one_of<I, V>(candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Schema::Enum(candidates.into_iter().map(Into::into).collect())
    }

    /// Conjunction.
    pub fn and(terms: Vec<Schema>) -> Self {
        Schema::And(terms)
    }

    /// Disjunction.
    pub fn or(branches: Vec<Schema>) -> Self {
        Schema::Or(branches)
    }

    /// Sequence of `element`.
    pub fn list(element: Schema) -> Self {
        Schema::Sequence(Box::new(element))
    }

    /// Mapping from `(key, schema)` pairs, in declaration order.
    pub fn mapping<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Mapping(fields.into_iter().collect())
    }

    /// A non-empty sequence of `element`.
    pub fn non_empty_list(element: Schema) -> Self {
        Schema::And(vec![Schema::list(element), Schema::Predicate(Predicate::non_empty())])
    }

    /// Named judging function.
    pub fn check<F>(name: &str, judge: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::Predicate(Predicate::new(name, judge))
    }

    /// Named fallible converter.
    pub fn convert<F>(name: &str, convert: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Schema::Converter(Converter::new(name, convert))
    }

    /// Literal default.
    pub fn default_value(value: impl Into<Value>) -> Self {
        Schema::Default(Supplier::Value(value.into()))
    }

    /// Lazily computed default.
    pub fn default_with<F>(supply: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Schema::Default(Supplier::lazy(supply))
    }

    /// Literal example.
    pub fn example(value: impl Into<Value>) -> Self {
        Schema::Example(Supplier::Value(value.into()))
    }

    /// Lazily computed example.
    pub fn example_with<F>(supply: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Schema::Example(Supplier::lazy(supply))
    }

    /// The Default supplier of this node: itself, or a direct member of an
    /// `And`/`Or` group.
    pub fn default_member(&self) -> Option<&Supplier> {
        match self {
            Schema::Default(s) => Some(s),
            Schema::And(terms) | Schema::Or(terms) => terms.iter().find_map(|t| match t {
                Schema::Default(s) => Some(s),
                _ => None,
            }),
            _ => None,
        }
    }

    /// The Example supplier among the direct members of an `And`/`Or` group.
    pub fn example_member(&self) -> Option<&Supplier> {
        match self {
            Schema::And(terms) | Schema::Or(terms) => terms.iter().find_map(|t| match t {
                Schema::Example(s) => Some(s),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Whether a mapping key declared with this schema may be absent.
    ///
    /// True for `Forbidden` and for groups with a direct `Forbidden` member.
    pub fn admits_absence(&self) -> bool {
        match self {
            Schema::Forbidden => true,
            Schema::And(terms) | Schema::Or(terms) => {
                terms.iter().any(|t| matches!(t, Schema::Forbidden))
            }
            _ => false,
        }
    }
}

impl From<TypeTag> for Schema {
    fn from(tag: TypeTag) -> Self {
        Schema::Type(tag)
    }
}

impl From<MappingSchema> for Schema {
    fn from(mapping: MappingSchema) -> Self {
        Schema::Mapping(mapping)
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// A regular expression matched from the start of the input.
///
/// The match is anchored at the start only: `^\d+` and `\d+` both accept
/// `"12ab"`. Add `$` for a full-string match.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` anchored at the start of the input.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"\A(?:{source})"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns true if a match begins at the start of `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The expression as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PredicateKind {
    General,
    NonEmpty,
}

/// A named judging function.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    kind: PredicateKind,
    judge: Arc<JudgeFn>,
}

impl Predicate {
    /// Wrap a judging function.
    pub fn new<F>(name: &str, judge: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            kind: PredicateKind::General,
            judge: Arc::new(judge),
        }
    }

    /// The length predicate: true for non-empty arrays, strings and objects.
    ///
    /// Its failure is reported as `emptyList` rather than `wrongType`.
    pub fn non_empty() -> Self {
        Self {
            name: Arc::from("non_empty"),
            kind: PredicateKind::NonEmpty,
            judge: Arc::new(|v: &Value| match v {
                Value::Array(a) => !a.is_empty(),
                Value::String(s) => !s.is_empty(),
                Value::Object(m) => !m.is_empty(),
                _ => false,
            }),
        }
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the length predicate.
    pub fn is_non_empty(&self) -> bool {
        self.kind == PredicateKind::NonEmpty
    }

    /// Apply the judging function.
    pub fn judge(&self, value: &Value) -> bool {
        (self.judge)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// A named value rewrite.
#[derive(Clone)]
pub struct Converter {
    name: Arc<str>,
    convert: Arc<ConvertFn>,
}

impl Converter {
    /// Wrap a fallible conversion.
    pub fn new<F>(name: &str, convert: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            convert: Arc::new(convert),
        }
    }

    /// Wrap an infallible conversion.
    pub fn map<F>(name: &str, convert: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::new(name, move |v| Ok(convert(v)))
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the conversion.
    ///
    /// Both an `Err` return and a panic inside the closure come back as
    /// `Err(message)`; nothing escapes this call.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        let convert = &self.convert;
        match panic::catch_unwind(AssertUnwindSafe(|| convert(value))) {
            Ok(Ok(converted)) => Ok(converted),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => {
                let message = format!("converter panicked: {}", panic_message(payload.as_ref()));
                tracing::trace!(converter = %self.name, "{message}");
                Err(message)
            }
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter({})", self.name)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Supplier
// ---------------------------------------------------------------------------

/// A literal, or a zero-argument function invoked each time a value is needed.
#[derive(Clone)]
pub enum Supplier {
    /// A literal value.
    Value(Value),
    /// A lazily invoked supplier.
    Lazy(Arc<SupplyFn>),
}

impl Supplier {
    /// Wrap a supplier function.
    pub fn lazy<F>(supply: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Supplier::Lazy(Arc::new(supply))
    }

    /// Produce the value.
    pub fn get(&self) -> Value {
        match self {
            Supplier::Value(v) => v.clone(),
            Supplier::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Supplier::Value(v) => write!(f, "Value({v})"),
            Supplier::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Value> for Supplier {
    fn from(value: Value) -> Self {
        Supplier::Value(value)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// How a field key is compared with input keys.
#[derive(Debug, Clone)]
enum KeyKind {
    /// A plain identifier, compared for equality.
    Identifier,
    /// Anything else, tried as a key pattern.
    Pattern(Pattern),
    /// Not an identifier and not a valid regular expression.
    Malformed(String),
}

/// One declared mapping entry.
#[derive(Debug, Clone)]
pub struct Field {
    key: String,
    key_kind: KeyKind,
    schema: Schema,
}

impl Field {
    /// Declare `key` with `schema`. The key is classified once, here.
    pub fn new(key: impl Into<String>, schema: Schema) -> Self {
        let key = key.into();
        let key_kind = if is_identifier(&key) {
            KeyKind::Identifier
        } else {
            match Pattern::new(&key) {
                Ok(p) => KeyKind::Pattern(p),
                Err(e) => KeyKind::Malformed(e.to_string()),
            }
        };
        Self {
            key,
            key_kind,
            schema,
        }
    }

    /// The key as declared.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the key is a plain identifier.
    pub fn is_identifier(&self) -> bool {
        matches!(self.key_kind, KeyKind::Identifier)
    }

    /// The key pattern, when the key is not an identifier.
    ///
    /// `Err` carries the compile error of a malformed pattern.
    pub fn key_pattern(&self) -> Result<Option<&Pattern>, &str> {
        match &self.key_kind {
            KeyKind::Identifier => Ok(None),
            KeyKind::Pattern(p) => Ok(Some(p)),
            KeyKind::Malformed(reason) => Err(reason),
        }
    }
}

/// Declared fields of a mapping schema, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MappingSchema {
    fields: Vec<Field>,
}

impl MappingSchema {
    /// An empty mapping schema: accepts only mappings with no keys
    /// (unless extra keys are allowed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a key replaces its schema in place.
    pub fn field(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.insert(Field::new(key, schema));
        self
    }

    fn insert(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The schema declared for exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.schema)
    }

    /// Whether any declared key is not a plain identifier.
    pub fn has_key_patterns(&self) -> bool {
        self.fields.iter().any(|f| !f.is_identifier())
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Schema)> for MappingSchema {
    fn from_iter<I: IntoIterator<Item = (K, Schema)>>(iter: I) -> Self {
        let mut mapping = MappingSchema::new();
        for (key, schema) in iter {
            mapping.insert(Field::new(key, schema));
        }
        mapping
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
