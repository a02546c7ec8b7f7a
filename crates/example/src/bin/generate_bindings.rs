//! Writes the example bindings to a file, registering roots by Rust type
//! instead of by marker.
//!
//! Hand-written code placed between the `//[Name:]` and `//[end]` lines of
//! an existing output file survives regeneration.

use std::env;
use std::path::PathBuf;

use serde_ts_codegen::CodeGenerator;
use serde_ts_example::{Board, Person};

fn main() -> serde_ts_codegen::Result<()> {
    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("generated/models.ts"));

    let mut codegen = CodeGenerator::new();
    codegen
        .set_header("Generated TypeScript declarations for serde-ts-example")
        .add_source_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/src"))?
        .add_type_of::<Person>()
        .add_type_of::<Vec<Board>>();

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    codegen.write_to_file(&out)?;

    println!("Wrote {}", out.display());
    Ok(())
}
