//! Example crate demonstrating serde-ts-codegen usage.
//!
//! The models below are ordinary serde types. `#[derive(TypeScript)]` marks
//! the roots, and build.rs turns them into `models.ts` in `OUT_DIR`, exposed
//! here as [`BINDINGS`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_ts_codegen::TypeScript;

/// The TypeScript generated from this file by build.rs.
pub const BINDINGS: &str = include_str!(concat!(env!("OUT_DIR"), "/models.ts"));

#[derive(Serialize, Deserialize, TypeScript, Debug, Clone, PartialEq)]
pub struct Dummy {
    pub something: String,
}

/// Embedded into [`Person`]; never declared on its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HasName {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Address {
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, TypeScript, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(flatten)]
    pub has_name: HasName,
    pub nicknames: Vec<String>,
    pub addresses: Vec<Address>,
    pub address: Option<Box<Address>>,
    pub metadata: HashMap<String, String>,
    pub friends: Vec<Person>,
    #[serde(rename = "a")]
    pub dummy: Dummy,
    #[ts(type = "Date", transform = "new Date(__VALUE__)")]
    pub born_at: DateTime<Utc>,
    /// Serialized as a unix timestamp, so it has no structural mapping.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub cache_key: u64,
}

/// Nested collections of records.
#[derive(Serialize, Deserialize, TypeScript, Debug, Clone, PartialEq)]
#[ts(rename = "Grid")]
pub struct Board {
    pub cells: Vec<Vec<Dummy>>,
    #[serde(rename = "cell-count")]
    pub cell_count: u32,
}
