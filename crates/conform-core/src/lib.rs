//! # conform-core: Foundational Types for conform
//!
//! This crate is the leaf of the conform workspace. It defines the vocabulary
//! every other crate speaks when describing a value and a failure to match a
//! schema. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Exact runtime types.** [`TypeTag`] classifies a `serde_json::Value`
//!    without aliasing: a boolean is never an integer, an integer is never a
//!    float.
//!
//! 2. **Closed failure catalog.** [`ErrorKind`] is a single enum with a fixed
//!    human-readable text per variant. Adding a kind forces every consumer to
//!    handle it.
//!
//! 3. **Failures are data.** A [`Failure`] carries kind, path, offending value
//!    and kind-specific detail. It is only turned into an error at the façade
//!    boundary, wrapped in [`ConformError`].
//!
//! 4. **Unambiguous diagnostics.** Offending values are rendered as compact
//!    JSON literals so the string `"null"` and the null value never print the
//!    same, and `5.0` never prints as `5`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `conform-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod path;
pub mod render;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{ConformError, ErrorKind, Failure, FailureDetail};
pub use path::FieldPath;
pub use render::render_literal;
pub use value::{is_blank, TypeTag};
