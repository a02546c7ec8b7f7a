//! TypeScript code generator for serde-annotated structs.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::catalog::TypeCatalog;
use crate::emitter::Emitter;
use crate::error::Result;
use crate::mapper::TypeMapper;
use crate::naming::NamingPolicy;
use crate::options::ConversionOptions;
use crate::registry::{Builtin, TypeRegistry};
use crate::resolver::Resolver;
use crate::types::RecordId;
use crate::walker::Walker;
use crate::writer;

/// The roots of one conversion and the options it runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Root type handles in registration order, e.g. `"crate::models::Person"`,
    /// `"Person"` or `"Vec<Person>"`.
    pub roots: Vec<String>,
    pub options: ConversionOptions,
}

impl ConversionRequest {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            roots: Vec::new(),
            options,
        }
    }

    pub fn add_root(&mut self, handle: impl Into<String>) -> &mut Self {
        self.roots.push(handle.into());
        self
    }
}

/// Convert the roots of `request` into TypeScript declarations.
///
/// Every root is resolved before anything is walked, so an invalid root
/// fails the whole conversion. The output is every declaration block
/// followed by a newline. With `custom_code`, each block also carries a
/// `//[Name:]` section filled from the map.
pub fn convert(
    catalog: &TypeCatalog,
    registry: &TypeRegistry,
    request: &ConversionRequest,
    custom_code: Option<&HashMap<String, String>>,
) -> Result<String> {
    let resolver = Resolver::new(catalog, registry);
    let roots = request
        .roots
        .iter()
        .map(|handle| resolver.resolve_root(handle))
        .collect::<Result<Vec<RecordId>>>()?;

    let records = Walker::new(resolver, NamingPolicy::new(&request.options)).walk(&roots);
    debug!(roots = roots.len(), records = records.len(), "walked type graph");

    let names: HashMap<RecordId, String> = records
        .iter()
        .map(|r| (r.id.clone(), r.display_name.clone()))
        .collect();

    let mut emitter = Emitter::new(&request.options, TypeMapper::new(&names));
    if let Some(custom_code) = custom_code {
        for owner in custom_code.keys() {
            if !records.iter().any(|r| &r.display_name == owner) {
                warn!(owner = %owner, "custom code for a type that is no longer generated, dropped");
            }
        }
        emitter = emitter.with_custom_code(custom_code);
    }

    let mut output = String::new();
    for record in &records {
        output.push_str(&emitter.emit(record));
        output.push('\n');
    }
    Ok(output)
}

/// Code generator that collects Rust sources and root types and outputs
/// TypeScript declarations.
///
/// ```
/// use serde_ts_codegen::CodeGenerator;
///
/// let mut generator = CodeGenerator::new();
/// generator
///     .add_source_str("struct Point { x: f64, y: f64 }")
///     .unwrap()
///     .add_type("Point");
///
/// let code = generator.generate().unwrap();
/// assert!(code.starts_with("export interface Point {\n    x: number;\n    y: number;\n"));
/// ```
#[derive(Debug, Default)]
pub struct CodeGenerator {
    catalog: TypeCatalog,
    registry: TypeRegistry,
    roots: Vec<String>,
    options: ConversionOptions,
    header: Option<String>,
}

impl CodeGenerator {
    /// Create a new code generator with the built-in type mappings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    /// Replace all conversion options.
    pub fn set_options(&mut self, options: ConversionOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Set a custom header comment for written files.
    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.header = Some(header.into());
        self
    }

    /// Teach the generator how an external type serializes.
    ///
    /// ```
    /// use serde_ts_codegen::CodeGenerator;
    /// use serde_ts_codegen::registry::Builtin;
    ///
    /// let mut generator = CodeGenerator::new();
    /// generator
    ///     .register_type("rust_decimal::Decimal", Builtin::Text)
    ///     .add_source_str("use rust_decimal::Decimal; struct Price { amount: Decimal }")
    ///     .unwrap()
    ///     .add_type("Price");
    /// assert!(generator.generate().unwrap().contains("amount: string;"));
    /// ```
    pub fn register_type(&mut self, path: impl Into<String>, builtin: Builtin) -> &mut Self {
        self.registry.register(path, builtin);
        self
    }

    /// Remove a type mapping, built-in or not.
    pub fn unregister_type(&mut self, path: &str) -> &mut Self {
        self.registry.unregister(path);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    /// Parse Rust source from a string as the crate root module.
    pub fn add_source_str(&mut self, source: &str) -> Result<&mut Self> {
        self.catalog.add_source_str(source)?;
        Ok(self)
    }

    /// Parse Rust source from a string as the module at `module`.
    pub fn add_module_source(&mut self, module: &str, source: &str) -> Result<&mut Self> {
        self.catalog.add_module_source(module, source)?;
        Ok(self)
    }

    /// Parse a single Rust source file as the crate root module.
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.catalog.add_source_file(path)?;
        Ok(self)
    }

    /// Parse a single Rust source file as the module at `module`.
    pub fn add_module_file(&mut self, module: &str, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.catalog.add_module_file(module, path)?;
        Ok(self)
    }

    /// Recursively scan a source directory, deriving module paths from file
    /// locations.
    pub fn add_source_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.catalog.add_source_dir(path)?;
        Ok(self)
    }

    /// Register a root type by handle. Registering a type twice is a no-op.
    pub fn add_type(&mut self, handle: impl Into<String>) -> &mut Self {
        self.roots.push(handle.into());
        self
    }

    /// Register `T` as a root type.
    ///
    /// The handle is `std::any::type_name::<T>()`, whose leading crate name
    /// is matched against `crate` when looked up in the scanned sources.
    pub fn add_type_of<T: ?Sized>(&mut self) -> &mut Self {
        self.add_type(std::any::type_name::<T>())
    }

    /// Register the type of `value` as a root type.
    pub fn add_instance<T: ?Sized>(&mut self, _value: &T) -> &mut Self {
        self.add_type_of::<T>()
    }

    /// Register every struct deriving `TypeScript` in the scanned sources, in
    /// scan order.
    pub fn add_marked_types(&mut self) -> &mut Self {
        let marked = self.catalog.marked().to_vec();
        self.roots.extend(marked);
        self
    }

    /// The conversion request for the current roots and options.
    pub fn request(&self) -> ConversionRequest {
        ConversionRequest {
            roots: self.roots.clone(),
            options: self.options.clone(),
        }
    }

    /// Generate the TypeScript declarations.
    pub fn generate(&self) -> Result<String> {
        convert(&self.catalog, &self.registry, &self.request(), None)
    }

    /// Generate, keeping hand-written code sections keyed by declared name.
    pub fn generate_with_custom_code(&self, custom_code: &HashMap<String, String>) -> Result<String> {
        convert(&self.catalog, &self.registry, &self.request(), Some(custom_code))
    }

    /// Write the generated code to a file.
    ///
    /// Hand-written `//[Name:]` sections of the existing file are carried
    /// over, and the previous file is backed up when
    /// [`ConversionOptions::backup_before_overwrite`] is set.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        writer::write_file(
            path.as_ref(),
            &self.options,
            self.header.as_deref(),
            |custom_code| self.generate_with_custom_code(custom_code),
        )
    }

    /// Write the header and generated code to a writer.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        let code = self.generate()?;
        out.write_all(writer::header_comment(self.header.as_deref()).as_bytes())?;
        out.write_all(code.as_bytes())?;
        Ok(())
    }
}
