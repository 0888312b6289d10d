//! # Façade
//!
//! The three entry points callers use: [`validate`], [`normalize`] and
//! [`synthesize`]. Each one fixes a [`Mode`], runs the [`Matcher`] from the
//! root path, and maps the outcome onto the caller's error policy.

use conform_core::{ConformError, Failure};
use serde_json::Value;

use crate::matcher::Matcher;
use crate::mock;
use crate::options::{Mode, Options};
use crate::schema::Schema;

/// Result of [`validate`] when failures are returned rather than raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value conforms.
    Pass,
    /// The value does not conform; carries the rendered failure message.
    Fail(String),
}

impl Verdict {
    /// Returns true if the value conforms.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(message) => Some(message),
        }
    }
}

/// Decide whether `value` conforms to `schema`.
///
/// # Errors
///
/// Returns [`ConformError::Rejected`] on failure when
/// `options.throw_on_failure` is set. Otherwise a failure is reported as
/// `Ok(Verdict::Fail(message))`.
pub fn validate(value: &Value, schema: &Schema, options: &Options) -> Result<Verdict, ConformError> {
    match Matcher::new(options, Mode::Validate).evaluate(value, schema) {
        Ok(_) => Ok(Verdict::Pass),
        Err(failure) => {
            log_failure("validate", &failure);
            if options.throw_on_failure {
                Err(failure.into())
            } else {
                Ok(Verdict::Fail(failure.message()))
            }
        }
    }
}

/// Validate `value` and return the rewritten result.
///
/// # Errors
///
/// Always returns [`ConformError::Rejected`] on failure, whatever
/// `throw_on_failure` says: there is no normalized value to return.
pub fn normalize(value: &Value, schema: &Schema, options: &Options) -> Result<Value, ConformError> {
    Matcher::new(options, Mode::Normalize)
        .evaluate(value, schema)
        .map_err(|failure| {
            log_failure("normalize", &failure);
            failure.into()
        })
}

/// Produce an example value for `schema`.
///
/// # Errors
///
/// Returns [`ConformError::Rejected`] when the sketch does not survive
/// normalization, e.g. a converter rejects its placeholder input.
pub fn synthesize(schema: &Schema, options: &Options) -> Result<Value, ConformError> {
    let raw = mock::sketch(schema, options).unwrap_or(Value::Null);
    Matcher::new(options, Mode::Synthesize)
        .evaluate(&raw, schema)
        .map_err(|failure| {
            log_failure("synthesize", &failure);
            failure.into()
        })
}

fn log_failure(operation: &str, failure: &Failure) {
    tracing::debug!(
        operation,
        kind = %failure.kind,
        path = %failure.path,
        "{}",
        failure.message()
    );
}
