use serde_ts_codegen::CodeGenerator;
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut codegen = CodeGenerator::new();
    codegen.options_mut().backup_before_overwrite = false;

    // Every struct deriving `TypeScript` becomes a root
    codegen
        .add_source_file(manifest_dir.join("src/lib.rs"))
        .expect("Failed to parse source file")
        .add_marked_types();

    codegen
        .write_to_file(out_dir.join("models.ts"))
        .expect("Failed to write bindings");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
