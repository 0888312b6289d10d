//! # Mock Subcommand
//!
//! Prints an example document synthesized from a schema document.

use anyhow::{Context, Result};
use clap::Args;

use conform_schema::{synthesize, Options};

use crate::{render_json, SchemaArgs};

/// Arguments for the `conform mock` subcommand.
#[derive(Args, Debug)]
pub struct MockArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the mock subcommand.
pub fn run_mock(args: &MockArgs, options: &Options) -> Result<u8> {
    let schema = args.schema.load()?;
    let options = args.schema.apply(options);
    let example = synthesize(&schema, &options).context("schema has no valid example")?;
    println!("{}", render_json(&example, args.pretty)?);
    Ok(0)
}
