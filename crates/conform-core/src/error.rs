//! # Error Types: Closed Failure Catalog
//!
//! Defines the failure vocabulary used throughout conform. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure names one [`ErrorKind`] from a closed catalog with a fixed
//!   human-readable text.
//! - A [`Failure`] is plain data: the kind, the path where matching stopped,
//!   the offending value and kind-specific detail. The matcher passes it up
//!   unchanged; only a façade decides whether it becomes an error.
//! - The rendered message follows [`crate::render::render_message`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::path::FieldPath;
use crate::render::render_message;

/// Closed catalog of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The schema itself is malformed.
    InvalidSchema,
    /// The value has the wrong runtime type, or no alternative matched.
    WrongType,
    /// The value is null where a value is required.
    EmptyValue,
    /// A declared mapping key is absent.
    MissingProperty,
    /// A mapping key is not declared by the schema.
    RedundantProperty,
    /// The non-empty length predicate failed.
    EmptyList,
    /// A sequence schema met a non-sequence value.
    NotList,
    /// A forbidden value is present.
    ShouldNotExist,
    /// The value is not one of the enumerated candidates.
    NotInEnumValues,
    /// A string does not match the pattern.
    NotMatchPattern,
    /// An example node was reached outside synthesis.
    ExampleOnlyInMock,
    /// A converter returned an error or panicked.
    ConversionFailed,
    /// The configured recursion bound was exceeded.
    NestingTooDeep,
}

impl ErrorKind {
    /// Human-readable text for this kind.
    pub fn text(self) -> &'static str {
        match self {
            ErrorKind::InvalidSchema => "schema is invalid",
            ErrorKind::WrongType => "value type is wrong",
            ErrorKind::EmptyValue => "value cannot be null",
            ErrorKind::MissingProperty => "property is missing",
            ErrorKind::RedundantProperty => "property is redundant",
            ErrorKind::EmptyList => "list cannot be empty",
            ErrorKind::NotList => "value should be a list",
            ErrorKind::ShouldNotExist => "value should not exist",
            ErrorKind::NotInEnumValues => "value is not among the enum list",
            ErrorKind::NotMatchPattern => "value does not match the regex pattern",
            ErrorKind::ExampleOnlyInMock => "example value is only used for mocking",
            ErrorKind::ConversionFailed => "value conversion failed",
            ErrorKind::NestingTooDeep => "schema nesting is too deep",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Kind-specific context attached to a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureDetail {
    /// What was expected: a type name, a pattern source, a predicate name.
    Expected(String),
    /// The full candidate set of an enum.
    Candidates(Vec<Value>),
    /// The message of an underlying cause (converter error, schema defect).
    Cause(String),
}

impl FailureDetail {
    fn as_argument(&self) -> Value {
        match self {
            FailureDetail::Expected(s) | FailureDetail::Cause(s) => Value::String(s.clone()),
            FailureDetail::Candidates(c) => Value::Array(c.clone()),
        }
    }
}

/// A structured match failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{}", self.message())]
pub struct Failure {
    /// Failure category.
    pub kind: ErrorKind,
    /// Where matching stopped.
    pub path: FieldPath,
    /// The offending value, when the kind has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Kind-specific context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<FailureDetail>,
}

impl Failure {
    /// A failure carrying only a path (`missingProperty`, `emptyList`, ...).
    pub fn at(kind: ErrorKind, path: &FieldPath) -> Self {
        Self {
            kind,
            path: path.clone(),
            value: None,
            detail: None,
        }
    }

    /// A failure carrying a path and the offending value.
    pub fn with_value(kind: ErrorKind, path: &FieldPath, value: &Value) -> Self {
        Self {
            kind,
            path: path.clone(),
            value: Some(value.clone()),
            detail: None,
        }
    }

    /// Attach kind-specific detail.
    pub fn detail(mut self, detail: FailureDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Positional message arguments: path, offending value, detail.
    pub fn arguments(&self) -> Vec<Value> {
        let mut args = vec![Value::String(self.path.as_str().to_string())];
        if let Some(value) = &self.value {
            args.push(value.clone());
        }
        if let Some(detail) = &self.detail {
            args.push(detail.as_argument());
        }
        args
    }

    /// The rendered diagnostic message.
    pub fn message(&self) -> String {
        render_message(self.kind.text(), &self.arguments())
    }
}

/// Top-level error type for conform operations.
#[derive(Error, Debug)]
pub enum ConformError {
    /// A value did not conform to its schema.
    #[error("{0}")]
    Rejected(Failure),
}

impl ConformError {
    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConformError::Rejected(f) => f.kind,
        }
    }

    /// The structured failure behind this error.
    pub fn failure(&self) -> &Failure {
        match self {
            ConformError::Rejected(f) => f,
        }
    }
}

impl From<Failure> for ConformError {
    fn from(failure: Failure) -> Self {
        ConformError::Rejected(failure)
    }
}
