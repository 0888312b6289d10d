//! # conform-schema: Structural Validation & Normalization
//!
//! Checks that a `serde_json::Value` has a shape described by a recursive
//! [`Schema`], rewrites it along the way (converters, defaults), and can
//! synthesize example values from the same schema.
//!
//! ## Operations (`api`)
//!
//! - [`validate`]: does the value conform? Returns a [`Verdict`], or raises
//!   when [`Options::throw_on_failure`] is set.
//! - [`normalize`]: conform and return the rewritten value.
//! - [`synthesize`]: produce an example value for a schema.
//!
//! ```
//! use conform_schema::{normalize, Options, Schema};
//! use conform_core::TypeTag;
//! use serde_json::json;
//!
//! let schema = Schema::mapping([
//!     ("id", Schema::of(TypeTag::Int)),
//!     ("age", Schema::or(vec![Schema::of(TypeTag::Int), Schema::default_value(18)])),
//! ]);
//! let out = normalize(&json!({"id": 1}), &schema, &Options::default()).unwrap();
//! assert_eq!(out, json!({"id": 1, "age": 18}));
//! ```
//!
//! ## Schema Documents (`document`)
//!
//! Schemas that need no custom closures can be written as JSON or YAML and
//! compiled with [`compile`] or [`load_schema`]. Converters and predicates are
//! named and resolved through a [`Builtins`] registry.
//!
//! ## Crate Policy
//!
//! - Depends only on `conform-core` internally.
//! - Schemas are immutable after construction; evaluation never mutates the
//!   input value.
//! - A user converter cannot abort an evaluation: errors and panics both
//!   surface as `conversionFailed`.

pub mod api;
pub mod builtins;
pub mod document;
pub mod matcher;
pub mod mock;
pub mod options;
pub mod schema;

pub use api::{normalize, synthesize, validate, Verdict};
pub use builtins::Builtins;
pub use document::{compile, load_schema, load_value, DocumentError, Format};
pub use matcher::Matcher;
pub use mock::UNCERTAIN_FORMAT;
pub use options::{Mode, Options, DEFAULT_MAX_DEPTH};
pub use schema::{BoxError, Converter, Field, MappingSchema, Pattern, Predicate, Schema, Supplier};
