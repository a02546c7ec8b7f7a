//! # serde-ts-codegen
//!
//! TypeScript declaration generator for serde-annotated Rust structs. Each
//! struct becomes an `interface` whose properties follow the struct's JSON
//! shape under serde, optionally with a `static createFrom(source: any)`
//! routine that rebuilds nested records from a parsed payload.
//!
//! ## Usage
//!
//! ### 1. Annotate your types
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use serde_ts_codegen::TypeScript;
//!
//! #[derive(Serialize, Deserialize, TypeScript)]
//! #[serde(rename_all = "camelCase")]
//! struct Person {
//!     first_name: String,
//!     #[serde(skip_serializing_if = "Vec::is_empty")]
//!     nicknames: Vec<String>,
//!     #[ts(type = "Date", transform = "new Date(__VALUE__)")]
//!     born_at: chrono::DateTime<chrono::Utc>,
//! }
//! ```
//!
//! ### 2. Generate bindings in build.rs
//!
//! ```rust,ignore
//! // build.rs
//! use serde_ts_codegen::CodeGenerator;
//!
//! fn main() {
//!     CodeGenerator::new()
//!         .add_source_dir("src").unwrap()
//!         .add_marked_types()
//!         .write_to_file("generated/models.ts").unwrap();
//!
//!     println!("cargo:rerun-if-changed=src");
//! }
//! ```
//!
//! Records reachable from the requested roots through fields are declared
//! too, each exactly once. Field types the generator cannot classify become
//! `any`; use `#[ts(type = "...")]` to say what they look like on the wire.

pub mod attrs;
pub mod catalog;
mod emitter;
mod error;
mod extractor;
mod generator;
pub mod mapper;
pub mod naming;
mod options;
pub mod registry;
pub mod resolver;
pub mod types;
mod walker;
pub mod writer;

pub use catalog::TypeCatalog;
pub use emitter::Emitter;
pub use error::{Error, Result};
pub use generator::{CodeGenerator, ConversionRequest, convert};
pub use options::ConversionOptions;
pub use registry::{Builtin, TypeRegistry};
pub use types::{FieldDescriptor, FieldKind, Primitive, RecordDescriptor, RecordId};
pub use walker::Walker;

#[cfg(feature = "derive")]
pub use serde_ts_derive::TypeScript;
