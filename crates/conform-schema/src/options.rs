//! # Options
//!
//! Caller configuration for one evaluation. Options are immutable for the
//! duration of a call: every recursive step sees the same reference.
//!
//! Partial configuration (from code, YAML or JSON) is merged over the
//! defaults through `#[serde(default)]`:
//!
//! ```yaml
//! allow_extra_keys: true
//! max_depth: 128
//! ```

use serde::{Deserialize, Serialize};

/// Default recursion bound.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Caller-facing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Raise on failure (default) instead of returning the message.
    pub throw_on_failure: bool,
    /// Copy undeclared mapping keys into the result instead of rejecting them.
    pub allow_extra_keys: bool,
    /// Treat non-identifier mapping keys as key patterns.
    pub dict_key_pattern_mode: bool,
    /// Deepest schema nesting the matcher will descend into.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            throw_on_failure: true,
            allow_extra_keys: false,
            dict_key_pattern_mode: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// Copy with `throw_on_failure` set.
    pub fn with_throw_on_failure(mut self, on: bool) -> Self {
        self.throw_on_failure = on;
        self
    }

    /// Copy with `allow_extra_keys` set.
    pub fn with_allow_extra_keys(mut self, on: bool) -> Self {
        self.allow_extra_keys = on;
        self
    }

    /// Copy with `dict_key_pattern_mode` set.
    pub fn with_dict_key_pattern_mode(mut self, on: bool) -> Self {
        self.dict_key_pattern_mode = on;
        self
    }

    /// Copy with `max_depth` set.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Parse a YAML (or JSON) configuration, filling omitted fields with defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// What an evaluation is for. Set by the façade, never by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Decide conformance.
    Validate,
    /// Decide conformance and return the rewritten value.
    Normalize,
    /// Normalize a synthesized example; Example nodes are live.
    Synthesize,
}
