//! serde-ts: generate TypeScript declarations from serde-annotated Rust
//! sources.
//!
//! Usage:
//!   serde-ts --output web/src/models.ts src/
//!   serde-ts -t crate::api::Request -t crate::api::Response --stdout src/api.rs
//!   serde-ts --config serde-ts.toml --prefix Api --output models.ts src/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_ts_codegen::{CodeGenerator, ConversionOptions};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "serde-ts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate TypeScript interfaces from serde-annotated Rust structs")]
#[command(long_about = None)]
struct Cli {
    /// Rust source files or directories to scan
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Root type to convert (repeatable); defaults to every `#[derive(TypeScript)]` struct
    #[arg(short = 't', long = "type", value_name = "PATH")]
    types: Vec<String>,

    /// Prefix for every declared type name
    #[arg(long)]
    prefix: Option<String>,

    /// Suffix for every declared type name
    #[arg(long)]
    suffix: Option<String>,

    /// Declare `interface` instead of `export interface`
    #[arg(long)]
    no_export: bool,

    /// Do not emit `static createFrom` routines
    #[arg(long)]
    no_create_from: bool,

    /// Indentation of the generated code
    #[arg(long)]
    indent: Option<String>,

    /// Directory for backups of the previous output
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Overwrite the output without a backup
    #[arg(long)]
    no_backup: bool,

    /// TOML file with conversion options; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// Verbose mode (show discovery and fallback logs)
    #[arg(short, long)]
    verbose: bool,
}

/// Options from `--config`, overridden by flags.
fn load_options(cli: &Cli) -> Result<ConversionOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ConversionOptions::default(),
    };

    if let Some(prefix) = &cli.prefix {
        options.name_prefix = prefix.clone();
    }
    if let Some(suffix) = &cli.suffix {
        options.name_suffix = suffix.clone();
    }
    if let Some(indent) = &cli.indent {
        options.indent = indent.clone();
    }
    if let Some(dir) = &cli.backup_dir {
        options.backup_dir = Some(dir.clone());
    }
    if cli.no_export {
        options.export_types = false;
    }
    if cli.no_create_from {
        options.emit_reconstruction_routines = false;
    }
    if cli.no_backup {
        options.backup_before_overwrite = false;
    }
    Ok(options)
}

fn add_source(codegen: &mut CodeGenerator, path: &Path) -> Result<()> {
    let scanned = if path.is_dir() {
        codegen.add_source_dir(path)
    } else {
        codegen.add_source_file(path)
    };
    scanned.with_context(|| format!("Failed to scan {}", path.display()))?;
    Ok(())
}

fn build_generator(cli: &Cli, options: ConversionOptions) -> Result<CodeGenerator> {
    let mut codegen = CodeGenerator::new();
    codegen.set_options(options);

    for source in &cli.sources {
        add_source(&mut codegen, source)?;
    }
    tracing::debug!(items = codegen.catalog().len(), "scanned sources");

    if cli.types.is_empty() {
        codegen.add_marked_types();
        if codegen.request().roots.is_empty() {
            bail!("No `#[derive(TypeScript)]` structs found; pass roots with --type");
        }
    } else {
        for ty in &cli.types {
            codegen.add_type(ty.as_str());
        }
    }
    Ok(codegen)
}

fn run(cli: &Cli) -> Result<()> {
    let options = load_options(cli)?;
    let codegen = build_generator(cli, options)?;

    match (&cli.output, cli.stdout) {
        (_, true) => codegen
            .write_to(io::stdout().lock())
            .context("Failed to generate declarations")?,
        (Some(output), false) => {
            codegen
                .write_to_file(output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(output = %output.display(), "Done");
        }
        (None, false) => bail!("--output is required unless --stdout is given"),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("serde_ts=debug,serde_ts_codegen=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("serde_ts=info,serde_ts_codegen=warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
