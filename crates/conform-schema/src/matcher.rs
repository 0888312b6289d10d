//! # Matcher: Recursive Value × Schema Walk
//!
//! Walks a value and a schema in lock-step and produces either the
//! normalized value or the first [`Failure`] encountered.
//!
//! ## Outcome Channel
//!
//! Every step returns `Result<Value, Failure>`. Failures are data: they are
//! propagated unchanged to the caller, with two exceptions:
//!
//! - `Or` discards the failure of every rejected branch, whatever its kind,
//!   and reports a generic `wrongType` when no branch accepts the value.
//! - Converter errors and panics are captured by [`Converter::apply`] and
//!   enter the same channel as `conversionFailed`.
//!
//! ## Value Ownership
//!
//! The input value is only borrowed. Mappings and sequences are rebuilt into
//! fresh containers; scalars are cloned through.
//!
//! [`Converter::apply`]: crate::schema::Converter::apply

use conform_core::{is_blank, ErrorKind, Failure, FailureDetail, FieldPath};
use serde_json::{Map, Value};

use crate::options::{Mode, Options};
use crate::schema::{MappingSchema, Predicate, Schema};

/// Result of one evaluation step.
pub type Outcome = Result<Value, Failure>;

/// Evaluates values against schemas under fixed options and mode.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    options: &'a Options,
    mode: Mode,
}

impl<'a> Matcher<'a> {
    /// Create a matcher.
    pub fn new(options: &'a Options, mode: Mode) -> Self {
        Self { options, mode }
    }

    /// The evaluation mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Evaluate `value` against `schema` from the root path.
    pub fn evaluate(&self, value: &Value, schema: &Schema) -> Outcome {
        self.eval(value, schema, &FieldPath::root(), 0)
    }

    fn eval(&self, value: &Value, schema: &Schema, path: &FieldPath, depth: usize) -> Outcome {
        if depth > self.options.max_depth {
            return Err(Failure::with_value(ErrorKind::NestingTooDeep, path, value).detail(
                FailureDetail::Expected(format!("at most {} levels", self.options.max_depth)),
            ));
        }

        match schema {
            Schema::Converter(converter) => converter.apply(value).map_err(|cause| {
                Failure::with_value(ErrorKind::ConversionFailed, path, value)
                    .detail(FailureDetail::Cause(cause))
            }),
            Schema::Default(supplier) => Ok(if is_missing(value) {
                supplier.get()
            } else {
                value.clone()
            }),
            Schema::Example(supplier) => {
                if self.mode == Mode::Synthesize {
                    Ok(supplier.get())
                } else {
                    Err(Failure::at(ErrorKind::ExampleOnlyInMock, path))
                }
            }
            Schema::Any => Ok(value.clone()),
            Schema::Forbidden => Err(Failure::with_value(ErrorKind::ShouldNotExist, path, value)),
            Schema::Pattern(pattern) => {
                let expected = || FailureDetail::Expected(pattern.as_str().to_string());
                match value {
                    Value::String(s) if pattern.is_match(s) => Ok(value.clone()),
                    Value::String(_) => Err(Failure::with_value(
                        ErrorKind::NotMatchPattern,
                        path,
                        value,
                    )
                    .detail(expected())),
                    _ => Err(Failure::with_value(ErrorKind::WrongType, path, value)
                        .detail(expected())),
                }
            }
            Schema::Type(tag) => {
                if tag.matches(value) {
                    Ok(value.clone())
                } else {
                    Err(Failure::with_value(ErrorKind::WrongType, path, value)
                        .detail(FailureDetail::Expected(tag.to_string())))
                }
            }
            Schema::Enum(candidates) => {
                if candidates.contains(value) {
                    Ok(value.clone())
                } else {
                    Err(Failure::with_value(ErrorKind::NotInEnumValues, path, value)
                        .detail(FailureDetail::Candidates(candidates.clone())))
                }
            }
            Schema::And(terms) => self.eval_and(schema, terms, value, path, depth),
            Schema::Or(branches) => self.eval_or(schema, branches, value, path, depth),
            Schema::Mapping(mapping) => self.eval_mapping(mapping, value, path, depth),
            Schema::Sequence(element) => self.eval_sequence(element, value, path, depth),
            Schema::Predicate(predicate) => judge(predicate, value, path),
        }
    }

    /// Left to right over one threaded value. Example terms never run, so a
    /// sketched example still passes through every converter and check.
    fn eval_and(
        &self,
        group: &Schema,
        terms: &[Schema],
        value: &Value,
        path: &FieldPath,
        depth: usize,
    ) -> Outcome {
        let mut current = match group.default_member() {
            Some(default) if is_missing(value) => default.get(),
            _ => value.clone(),
        };
        for term in terms {
            if matches!(term, Schema::Example(_)) {
                continue;
            }
            current = self.eval(&current, term, path, depth + 1)?;
        }
        Ok(current)
    }

    /// First branch that accepts the original value wins.
    fn eval_or(
        &self,
        group: &Schema,
        branches: &[Schema],
        value: &Value,
        path: &FieldPath,
        depth: usize,
    ) -> Outcome {
        if is_missing(value) {
            if let Some(default) = group.default_member() {
                return Ok(default.get());
            }
        }

        for (i, branch) in branches.iter().enumerate() {
            match self.eval(value, branch, path, depth + 1) {
                Ok(accepted) => return Ok(accepted),
                Err(failure) => {
                    tracing::trace!(path = %path, branch = i, kind = ?failure.kind, "or-branch rejected");
                }
            }
        }
        Err(Failure::with_value(ErrorKind::WrongType, path, value))
    }

    fn eval_mapping(
        &self,
        mapping: &MappingSchema,
        value: &Value,
        path: &FieldPath,
        depth: usize,
    ) -> Outcome {
        let Value::Object(input) = value else {
            return Err(Failure::with_value(ErrorKind::WrongType, path, value)
                .detail(FailureDetail::Expected("dict".to_string())));
        };

        let pattern_mode = self.options.dict_key_pattern_mode && mapping.has_key_patterns();
        let mut output = Map::new();

        // Declared keys first: presence, absence, defaults.
        for field in mapping.fields() {
            if pattern_mode && !field.is_identifier() {
                if let Err(reason) = field.key_pattern() {
                    return Err(Failure::with_value(
                        ErrorKind::InvalidSchema,
                        &path.key(field.key()),
                        &Value::from(field.key()),
                    )
                    .detail(FailureDetail::Cause(reason.to_string())));
                }
                continue;
            }

            let child = path.key(field.key());
            let schema = field.schema();
            match input.get(field.key()) {
                Some(present) => {
                    let normalized = self.eval(present, schema, &child, depth + 1)?;
                    output.insert(field.key().to_string(), normalized);
                }
                None if schema.default_member().is_some() => {
                    let normalized = self.eval(&Value::Null, schema, &child, depth + 1)?;
                    output.insert(field.key().to_string(), normalized);
                }
                None if schema.admits_absence() => {}
                None => return Err(Failure::at(ErrorKind::MissingProperty, &child)),
            }
        }

        // Then every input key no exact field claimed.
        for (key, present) in input {
            let declared = if pattern_mode {
                mapping
                    .fields()
                    .iter()
                    .any(|f| f.is_identifier() && f.key() == key)
            } else {
                mapping.get(key).is_some()
            };
            if declared {
                continue;
            }

            let child = path.key(key);
            let by_pattern = if pattern_mode {
                mapping.fields().iter().find(|f| {
                    matches!(f.key_pattern(), Ok(Some(pattern)) if pattern.is_match(key))
                })
            } else {
                None
            };

            match by_pattern {
                Some(field) => {
                    let normalized = self.eval(present, field.schema(), &child, depth + 1)?;
                    output.insert(key.clone(), normalized);
                }
                None if self.options.allow_extra_keys => {
                    output.insert(key.clone(), present.clone());
                }
                None => return Err(Failure::at(ErrorKind::RedundantProperty, &child)),
            }
        }

        Ok(Value::Object(output))
    }

    fn eval_sequence(
        &self,
        element: &Schema,
        value: &Value,
        path: &FieldPath,
        depth: usize,
    ) -> Outcome {
        let Value::Array(items) = value else {
            return Err(Failure::with_value(ErrorKind::NotList, path, value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.eval(item, element, &path.index(i), depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

fn judge(predicate: &Predicate, value: &Value, path: &FieldPath) -> Outcome {
    if predicate.judge(value) {
        Ok(value.clone())
    } else if predicate.is_non_empty() {
        Err(Failure::at(ErrorKind::EmptyList, path))
    } else {
        Err(Failure::with_value(ErrorKind::WrongType, path, value)
            .detail(FailureDetail::Expected(format!("judged by {}", predicate.name()))))
    }
}

/// Null or a whitespace-only string: the values a Default replaces.
fn is_missing(value: &Value) -> bool {
    value.is_null() || is_blank(value)
}
