//! # conform-cli: CLI Tool for conform
//!
//! Provides the `conform` command-line interface over declarative schema
//! documents (JSON or YAML, see `conform_schema::document`).
//!
//! ## Subcommands
//!
//! - `conform check`: does a document conform? Prints `ok` or the failure.
//! - `conform normalize`: prints the normalized document as JSON.
//! - `conform mock`: prints an example document synthesized from the schema.
//!
//! ```bash
//! conform check --schema user.schema.yaml user.json
//! conform normalize --schema user.schema.yaml --allow-extra-keys user.yaml --pretty
//! conform -vv --config conform.yaml mock --schema user.schema.yaml
//! ```
//!
//! Exit code 0 on success, 1 on rejection or operational error.

pub mod check;
pub mod mock;
pub mod normalize;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use conform_schema::{document, load_schema, Builtins, Format, Options, Schema};

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Schema document (`.yaml`/`.yml` as YAML, anything else as JSON).
    #[arg(long, short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Copy undeclared mapping keys through instead of rejecting them.
    #[arg(long)]
    pub allow_extra_keys: bool,

    /// Treat every mapping key in the schema literally, never as a pattern.
    #[arg(long)]
    pub no_key_patterns: bool,
}

impl SchemaArgs {
    /// Layer the command-line flags over configured options.
    pub fn apply(&self, options: &Options) -> Options {
        let mut options = options.clone();
        if self.allow_extra_keys {
            options.allow_extra_keys = true;
        }
        if self.no_key_patterns {
            options.dict_key_pattern_mode = false;
        }
        options
    }

    /// Load and compile the schema document with the standard built-ins.
    pub fn load(&self) -> Result<Schema> {
        load_schema(&self.schema, &Builtins::standard())
            .with_context(|| format!("failed to load schema {}", self.schema.display()))
    }
}

/// Load evaluation options from a YAML/JSON file, or the defaults.
pub fn load_options(config: Option<&Path>) -> Result<Options> {
    let Some(path) = config else {
        return Ok(Options::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let options = Options::from_yaml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(config = %path.display(), ?options, "loaded options");
    Ok(options)
}

/// Read the input document from `path`, or from stdin when absent.
///
/// Stdin is parsed as YAML, which also accepts JSON.
pub fn load_input(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => document::load_value(path)
            .with_context(|| format!("failed to load document {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            document::parse_str(&text, Format::Yaml, "<stdin>").context("failed to parse stdin")
        }
    }
}

/// Serialize a value for stdout.
pub fn render_json(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.context("failed to serialize output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_default_without_config() {
        assert_eq!(load_options(None).unwrap(), Options::default());
    }

    #[test]
    fn test_load_options_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conform.yaml");
        std::fs::write(&path, "throw_on_failure: false\nmax_depth: 10\n").unwrap();
        let options = load_options(Some(&path)).unwrap();
        assert!(!options.throw_on_failure);
        assert_eq!(options.max_depth, 10);
    }

    #[test]
    fn test_load_options_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conform.yaml");
        std::fs::write(&path, "verbose: true\n").unwrap();
        let err = load_options(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = SchemaArgs {
            schema: PathBuf::from("s.json"),
            allow_extra_keys: true,
            no_key_patterns: true,
        };
        let options = args.apply(&Options::default());
        assert!(options.allow_extra_keys);
        assert!(!options.dict_key_pattern_mode);

        let unset = SchemaArgs {
            allow_extra_keys: false,
            no_key_patterns: false,
            ..args
        };
        let configured = Options::default().with_allow_extra_keys(true);
        assert!(unset.apply(&configured).allow_extra_keys);
    }

    #[test]
    fn test_render_json() {
        let v = serde_json::json!({"b": 1, "a": [true]});
        assert_eq!(render_json(&v, false).unwrap(), r#"{"a":[true],"b":1}"#);
        assert!(render_json(&v, true).unwrap().contains('\n'));
    }
}
