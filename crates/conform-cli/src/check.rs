//! # Check Subcommand
//!
//! Decides whether one document conforms to a schema document. Prints `ok`
//! or the rendered failure message on stdout.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use conform_schema::{validate, Options, Verdict};

use crate::{load_input, SchemaArgs};

/// Arguments for the `conform check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Document to check. Read from stdin when omitted.
    #[arg(value_name = "DOC")]
    pub document: Option<PathBuf>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the document conforms, 1 when it does not.
pub fn run_check(args: &CheckArgs, options: &Options) -> Result<u8> {
    let schema = args.schema.load()?;
    let value = load_input(args.document.as_deref())?;
    let options = args.schema.apply(options).with_throw_on_failure(false);

    match validate(&value, &schema, &options)? {
        Verdict::Pass => {
            println!("ok");
            Ok(0)
        }
        Verdict::Fail(message) => {
            println!("{message}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(schema: &Path, document: &Path) -> CheckArgs {
        CheckArgs {
            schema: SchemaArgs {
                schema: schema.to_path_buf(),
                allow_extra_keys: false,
                no_key_patterns: false,
            },
            document: Some(document.to_path_buf()),
        }
    }

    #[test]
    fn test_check_pass_and_fail() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(&schema, "id: { $type: int }\n").unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"id": 1}"#).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"id": "1"}"#).unwrap();

        assert_eq!(run_check(&args(&schema, &good), &Options::default()).unwrap(), 0);
        assert_eq!(run_check(&args(&schema, &bad), &Options::default()).unwrap(), 1);
    }

    #[test]
    fn test_check_malformed_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        std::fs::write(&schema, r#"{"id": 5}"#).unwrap();
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, "{}").unwrap();

        let err = run_check(&args(&schema, &doc), &Options::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to load schema"), "{message}");
        assert!(message.contains("schema is invalid: .id, 5"), "{message}");
    }
}
