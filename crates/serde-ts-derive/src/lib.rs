//! Proc-macro providing the `#[derive(TypeScript)]` attribute.
//!
//! This macro is a **no-op annotation** - it doesn't generate any code.
//! It marks a struct as a root for `serde-ts-codegen` and lets the struct
//! carry `#[ts(...)]` helper attributes, which the generator reads from
//! source.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde::Serialize;
//! use serde_ts_codegen::TypeScript;
//!
//! #[derive(Serialize, TypeScript)]
//! #[ts(rename = "User")]
//! struct Account {
//!     name: String,
//!     #[ts(type = "Date", transform = "new Date(__VALUE__)")]
//!     created_at: chrono::DateTime<chrono::Utc>,
//! }
//! ```
//!
//! Then in your build.rs:
//!
//! ```rust,ignore
//! use serde_ts_codegen::CodeGenerator;
//!
//! fn main() {
//!     CodeGenerator::new()
//!         .add_source_dir("src").unwrap()
//!         .add_marked_types()
//!         .write_to_file("bindings.ts").unwrap();
//! }
//! ```

use proc_macro::TokenStream;

/// Marker derive macro for TypeScript declaration generation.
///
/// Accepts `#[ts(rename = "...")]` on the struct and
/// `#[ts(type = "...", transform = "...")]` on fields.
#[proc_macro_derive(TypeScript, attributes(ts))]
pub fn derive_typescript(_input: TokenStream) -> TokenStream {
    // No-op: declarations are generated from source by serde-ts-codegen
    TokenStream::new()
}
