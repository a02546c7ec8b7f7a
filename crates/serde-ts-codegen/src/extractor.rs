//! Source file parser that fills a [`TypeCatalog`] from Rust code.
//!
//! Every struct, enum and type alias is catalogued under its fully-qualified path, so
//! the walker can follow field types into items that were never requested
//! explicitly. Structs deriving the `TypeScript` marker are additionally
//! remembered so they can be registered as roots in one call.
//!
//! ## Use-item analysis
//!
//! The extractor processes `use` statements in each module to build a
//! mapping from local names to module paths:
//!
//! - `use std::collections::BTreeMap` maps `"BTreeMap"` to `std::collections::BTreeMap`
//! - `use std::collections::BTreeMap as MyMap` maps `"MyMap"` to `std::collections::BTreeMap`
//! - `use super::Address` maps `"Address"` to `super::Address`, normalized against
//!   the declaring module when a field type is resolved
//!
//! ## Module paths
//!
//! [`TypeCatalog::add_source_dir`] derives each file's module path from its
//! location: `lib.rs`/`main.rs` are the crate root, `models.rs` and
//! `models/mod.rs` are `crate::models`, and inline `mod` blocks nest further.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use syn::{
    Attribute, Fields, GenericArgument, Item, PathArguments, Type, TypePath, UseTree,
};
use tracing::debug;
use walkdir::WalkDir;

use crate::attrs::{parse_container_attrs, parse_field_attrs};
use crate::catalog::{CatalogItem, FieldDef, ItemShape, TypeCatalog};
use crate::error::{Error, Result};
use crate::types::TypeExpr;

/// The fully-qualified derive marker paths that flag a struct as a root.
const MARKERS: &[&str] = &["serde_ts_codegen::TypeScript", "serde_ts_derive::TypeScript"];

const ROOT_MODULE: &str = "crate";

/// Recursively flatten a `UseTree` into import entries.
///
/// Each entry maps the local name to its path segments built from `prefix`.
fn collect_imports(tree: &UseTree, prefix: &[String], imports: &mut HashMap<String, Vec<String>>) {
    match tree {
        UseTree::Path(p) => {
            let mut new_prefix = prefix.to_vec();
            new_prefix.push(p.ident.to_string());
            collect_imports(&p.tree, &new_prefix, imports);
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            if name == "self" {
                // `use foo::bar::{self}` imports `bar`
                if let Some(last) = prefix.last() {
                    imports.insert(last.clone(), prefix.to_vec());
                }
            } else {
                let mut full_path = prefix.to_vec();
                full_path.push(name.clone());
                imports.insert(name, full_path);
            }
        }
        UseTree::Rename(r) => {
            let alias = r.rename.to_string();
            let mut full_path = prefix.to_vec();
            if r.ident != "self" {
                full_path.push(r.ident.to_string());
            }
            imports.insert(alias, full_path);
        }
        UseTree::Glob(_) => {
            // Glob imports can't be resolved statically
        }
        UseTree::Group(g) => {
            for item in &g.items {
                collect_imports(item, prefix, imports);
            }
        }
    }
}

fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

/// Build the import map for one module from its `use` items.
fn build_imports(items: &[Item]) -> HashMap<String, Vec<String>> {
    let mut imports = HashMap::new();

    for item in items {
        if let Item::Use(item_use) = item {
            collect_imports(&item_use.tree, &[], &mut imports);
        }
    }

    imports
}

/// Check if a struct derives the `TypeScript` marker.
///
/// Recognizes:
/// - `#[derive(TypeScript)]` when `use serde_ts_codegen::TypeScript` is in scope
/// - `#[derive(serde_ts_codegen::TypeScript)]` or any qualified path ending in `::TypeScript`
/// - `#[derive(Ts)]` when `use serde_ts_codegen::TypeScript as Ts` is in scope
fn has_marker_derive(attrs: &[Attribute], imports: &HashMap<String, Vec<String>>) -> bool {
    for attr in attrs {
        if attr.path().is_ident("derive")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
        {
            for path in nested {
                if path.segments.len() == 1 {
                    // Unqualified: resolve via imports
                    let ident = path.segments[0].ident.to_string();
                    if imports
                        .get(&ident)
                        .is_some_and(|p| MARKERS.contains(&p.join("::").as_str()))
                    {
                        return true;
                    }
                } else {
                    let qualified = path_segments(&path).join("::");
                    if MARKERS.contains(&qualified.as_str()) || qualified.ends_with("::TypeScript") {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Convert a syn `Type` into the catalog's unresolved [`TypeExpr`].
pub(crate) fn type_expr(ty: &Type) -> TypeExpr {
    match ty {
        Type::Path(TypePath { qself: None, path }) => {
            let args = path
                .segments
                .last()
                .map(collect_type_args)
                .unwrap_or_default();
            TypeExpr::Path {
                segments: path_segments(path),
                args,
            }
        }
        Type::Array(array) => TypeExpr::Array(Box::new(type_expr(&array.elem))),
        Type::Slice(slice) => TypeExpr::Array(Box::new(type_expr(&slice.elem))),
        Type::Reference(reference) => TypeExpr::Reference(Box::new(type_expr(&reference.elem))),
        Type::Ptr(ptr) => TypeExpr::Reference(Box::new(type_expr(&ptr.elem))),
        Type::Tuple(tuple) => TypeExpr::Tuple(tuple.elems.iter().map(type_expr).collect()),
        Type::Paren(paren) => type_expr(&paren.elem),
        Type::Group(group) => type_expr(&group.elem),
        _ => TypeExpr::Opaque,
    }
}

/// Collect the type arguments from a path segment's angle brackets.
///
/// Skips non-type arguments (lifetimes, const generics, associated items).
fn collect_type_args(segment: &syn::PathSegment) -> Vec<TypeExpr> {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return vec![];
    };

    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(type_expr(ty)),
            _ => None,
        })
        .collect()
}

fn field_ident(field: &syn::Field) -> Option<String> {
    let ident = field.ident.as_ref()?.to_string();
    Some(ident.strip_prefix("r#").map(str::to_string).unwrap_or(ident))
}

fn struct_shape(fields: &Fields) -> ItemShape {
    match fields {
        Fields::Named(named) => ItemShape::Record(
            named
                .named
                .iter()
                .filter_map(|f| {
                    Some(FieldDef::new(field_ident(f)?, type_expr(&f.ty)).with_attrs(parse_field_attrs(&f.attrs)))
                })
                .collect(),
        ),
        Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            ItemShape::Newtype(type_expr(&unnamed.unnamed[0].ty))
        }
        Fields::Unnamed(_) => ItemShape::Tuple,
        Fields::Unit => ItemShape::Unit,
    }
}

/// `impl Serialize for X` / `impl<'de> serde::Deserialize<'de> for X`.
fn custom_serde_self_type(item_impl: &syn::ItemImpl) -> Option<Vec<String>> {
    let (_, trait_path, _) = item_impl.trait_.as_ref()?;
    let trait_name = trait_path.segments.last()?.ident.to_string();
    if trait_name != "Serialize" && trait_name != "Deserialize" {
        return None;
    }
    match &*item_impl.self_ty {
        Type::Path(TypePath { qself: None, path }) => Some(path_segments(path)),
        _ => None,
    }
}

fn process_items(catalog: &mut TypeCatalog, items: &[Item], module: &str) {
    let imports = build_imports(items);
    for (local, target) in &imports {
        catalog.add_import(module, local, target.clone());
    }

    for item in items {
        match item {
            Item::Struct(s) => {
                let entry = CatalogItem::new(module, s.ident.to_string(), struct_shape(&s.fields))
                    .with_attrs(parse_container_attrs(&s.attrs));
                let path = entry.path.clone();
                debug!(path = %path, "catalogued struct");
                catalog.insert(entry);
                if has_marker_derive(&s.attrs, &imports) {
                    catalog.mark(path);
                }
            }
            Item::Enum(e) => {
                catalog.insert(
                    CatalogItem::new(module, e.ident.to_string(), ItemShape::Enum)
                        .with_attrs(parse_container_attrs(&e.attrs)),
                );
            }
            Item::Type(item_type) => {
                catalog.insert(CatalogItem::new(
                    module,
                    item_type.ident.to_string(),
                    ItemShape::Alias(type_expr(&item_type.ty)),
                ));
            }
            Item::Impl(item_impl) => {
                if let Some(self_ty) = custom_serde_self_type(item_impl) {
                    catalog.add_custom_serde_impl(module, self_ty);
                }
            }
            Item::Mod(m) => {
                if let Some((_, content)) = &m.content {
                    let nested = format!("{module}::{}", m.ident);
                    process_items(catalog, content, &nested);
                }
            }
            _ => {}
        }
    }
}

fn parse_source(catalog: &mut TypeCatalog, source: &str, module: &str, path: &Path) -> Result<()> {
    let file = syn::parse_file(source).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    process_items(catalog, &file.items, module);
    Ok(())
}

/// Derive the module path of `file` relative to the source root `root`.
fn module_path_for(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut segments = vec![ROOT_MODULE.to_string()];
    let components: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let count = components.len();
    for (i, component) in components.into_iter().enumerate() {
        let is_last = i + 1 == count;
        if is_last && (component == "mod" || (count == 1 && (component == "lib" || component == "main"))) {
            continue;
        }
        segments.push(component);
    }
    segments.join("::")
}

impl TypeCatalog {
    /// Parse Rust source from a string as the crate root module.
    pub fn add_source_str(&mut self, source: &str) -> Result<&mut Self> {
        self.add_module_source(ROOT_MODULE, source)
    }

    /// Parse Rust source from a string as the module at `module`
    /// (e.g. `"crate::models"`).
    pub fn add_module_source(&mut self, module: &str, source: &str) -> Result<&mut Self> {
        parse_source(self, source, module, Path::new("<string>"))?;
        Ok(self)
    }

    /// Parse a single Rust source file as the crate root module.
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.add_module_file(ROOT_MODULE, path)
    }

    /// Parse a single Rust source file as the module at `module`.
    pub fn add_module_file(&mut self, module: &str, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        parse_source(self, &source, module, path)?;
        Ok(self)
    }

    /// Recursively scan a directory for `.rs` files and catalogue their items.
    ///
    /// Files are visited in file-name order so repeated scans produce the
    /// same catalog.
    pub fn add_source_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let root = path.as_ref();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            let file: PathBuf = entry.path().to_path_buf();
            if file.extension().is_some_and(|e| e == "rs") {
                let source = fs::read_to_string(&file)?;
                let module = module_path_for(root, &file);
                debug!(file = %file.display(), module = %module, "scanning source file");
                parse_source(self, &source, &module, &file)?;
            }
        }
        Ok(self)
    }
}
