//! # Normalize Subcommand
//!
//! Validates a document and prints the rewritten result as JSON. Rejections
//! go to stderr so stdout only ever carries a normalized document.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use conform_schema::{normalize, Options};

use crate::{load_input, render_json, SchemaArgs};

/// Arguments for the `conform normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Document to normalize. Read from stdin when omitted.
    #[arg(value_name = "DOC")]
    pub document: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the normalize subcommand.
///
/// Returns exit code: 0 with the normalized document on stdout, 1 when the
/// document is rejected.
pub fn run_normalize(args: &NormalizeArgs, options: &Options) -> Result<u8> {
    let schema = args.schema.load()?;
    let value = load_input(args.document.as_deref())?;
    let options = args.schema.apply(options);

    match normalize(&value, &schema, &options) {
        Ok(normalized) => {
            println!("{}", render_json(&normalized, args.pretty)?);
            Ok(0)
        }
        Err(e) => {
            tracing::info!(kind = %e.kind(), path = %e.failure().path, "document rejected");
            eprintln!("{e}");
            Ok(1)
        }
    }
}
