//! The set of Rust items known to the generator.
//!
//! The catalog is filled by the [extractor](crate::extractor) (or by hand via
//! [`TypeCatalog::insert`]) and is read-only during a conversion, so one
//! catalog can back any number of independent conversions.

use std::collections::{BTreeMap, HashMap};

use crate::attrs::{ContainerAttrs, FieldAttrs};
use crate::types::TypeExpr;

/// Maximum number of `use`/re-export hops followed while resolving a path.
const MAX_RESOLVE_DEPTH: usize = 16;

/// A struct field as declared in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field identifier with any `r#` prefix removed.
    pub ident: String,
    pub ty: TypeExpr,
    pub attrs: FieldAttrs,
}

impl FieldDef {
    pub fn new(ident: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            ident: ident.into(),
            ty,
            attrs: FieldAttrs::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: FieldAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

/// The shape of a catalogued item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemShape {
    /// A struct with named fields.
    Record(Vec<FieldDef>),
    /// `struct Meters(f64);` serializes as its single field.
    Newtype(TypeExpr),
    /// A tuple struct with more than one field.
    Tuple,
    /// `struct Marker;`
    Unit,
    Enum,
    /// `type Friends = Vec<Person>;`
    Alias(TypeExpr),
}

/// A struct, enum or type alias declared in a scanned module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Fully-qualified path, e.g. `crate::models::Person`.
    pub path: String,
    /// Path of the declaring module, e.g. `crate::models`.
    pub module: String,
    pub ident: String,
    pub shape: ItemShape,
    pub attrs: ContainerAttrs,
}

impl CatalogItem {
    pub fn new(module: impl Into<String>, ident: impl Into<String>, shape: ItemShape) -> Self {
        let module = module.into();
        let ident = ident.into();
        Self {
            path: format!("{module}::{ident}"),
            module,
            ident,
            shape,
            attrs: ContainerAttrs::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: ContainerAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn is_record(&self) -> bool {
        matches!(self.shape, ItemShape::Record(_))
    }
}

/// Per-module context built from `use` items.
///
/// Maps each local name to the path segments it was imported from, as
/// written (`use super::Inner` records `["super", "Inner"]`). Relative
/// segments are normalized at resolution time against the owning module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleScope {
    pub imports: HashMap<String, Vec<String>>,
}

/// Outcome of resolving a path written inside some module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// A catalogued item.
    Item(&'a CatalogItem),
    /// Not in the catalog; the path with imports applied, for registry lookup.
    External,
}

/// Catalog of items keyed by fully-qualified path.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    items: BTreeMap<String, CatalogItem>,
    scopes: HashMap<String, ModuleScope>,
    /// `impl Serialize for X` / `impl Deserialize for X`, as (module, self type path).
    custom_impls: Vec<(String, Vec<String>)>,
    /// Items deriving the `TypeScript` marker, in scan order.
    marked: Vec<String>,
}

fn split_path(path: &str) -> Vec<String> {
    path.split("::").map(str::to_string).collect()
}

fn join_path(segments: &[String]) -> String {
    segments.join("::")
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an item.
    pub fn insert(&mut self, item: CatalogItem) -> &mut Self {
        self.scopes.entry(item.module.clone()).or_default();
        self.items.insert(item.path.clone(), item);
        self
    }

    /// Record a `use` import for `module`.
    pub fn add_import(
        &mut self,
        module: impl Into<String>,
        local: impl Into<String>,
        target: Vec<String>,
    ) -> &mut Self {
        self.scopes
            .entry(module.into())
            .or_default()
            .imports
            .insert(local.into(), target);
        self
    }

    /// Record that the type at `self_ty` (as written in `module`) implements
    /// `Serialize` or `Deserialize` by hand.
    pub fn add_custom_serde_impl(&mut self, module: impl Into<String>, self_ty: Vec<String>) {
        self.custom_impls.push((module.into(), self_ty));
    }

    /// Mark an item as deriving the `TypeScript` marker.
    pub fn mark(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.marked.contains(&path) {
            self.marked.push(path);
        }
    }

    pub fn get(&self, path: &str) -> Option<&CatalogItem> {
        self.items.get(path)
    }

    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Paths of items deriving the `TypeScript` marker, in scan order.
    pub fn marked(&self) -> &[String] {
        &self.marked
    }

    pub fn scope(&self, module: &str) -> Option<&ModuleScope> {
        self.scopes.get(module)
    }

    /// Whether the item at `path` has a hand-written serde impl somewhere in
    /// the scanned sources.
    pub fn has_custom_serde_impl(&self, path: &str) -> bool {
        self.custom_impls.iter().any(|(module, segments)| {
            matches!(self.resolve(module, segments), (Resolved::Item(item), _) if item.path == path)
        })
    }

    /// Resolve a path written inside `module`.
    ///
    /// Returns the resolution together with the fully-qualified path string
    /// (imports applied, `crate`/`self`/`super` normalized) used for registry
    /// lookups when the path is not catalogued.
    pub fn resolve<'a>(&'a self, module: &str, segments: &[String]) -> (Resolved<'a>, String) {
        self.resolve_in(module, segments, 0)
    }

    fn resolve_in<'a>(
        &'a self,
        module: &str,
        segments: &[String],
        depth: usize,
    ) -> (Resolved<'a>, String) {
        let Some((head, rest)) = segments.split_first() else {
            return (Resolved::External, String::new());
        };
        if depth > MAX_RESOLVE_DEPTH {
            return (Resolved::External, join_path(segments));
        }

        match head.as_str() {
            "crate" => return self.lookup_absolute(segments.to_vec(), depth),
            "self" => {
                let mut absolute = split_path(module);
                absolute.extend_from_slice(rest);
                return self.lookup_absolute(absolute, depth);
            }
            "super" => {
                let mut absolute = split_path(module);
                let mut remaining = segments;
                while let Some((first, tail)) = remaining.split_first()
                    && first == "super"
                {
                    if absolute.len() > 1 {
                        absolute.pop();
                    }
                    remaining = tail;
                }
                absolute.extend_from_slice(remaining);
                return self.lookup_absolute(absolute, depth);
            }
            _ => {}
        }

        if let Some(target) = self.scopes.get(module).and_then(|s| s.imports.get(head)) {
            let mut full = target.clone();
            full.extend_from_slice(rest);
            return self.resolve_in(module, &full, depth + 1);
        }

        // Item declared in (or below) the current module
        let mut local = split_path(module);
        local.extend_from_slice(segments);
        if let (Resolved::Item(item), path) = self.lookup_absolute(local, depth) {
            return (Resolved::Item(item), path);
        }

        self.lookup_absolute(segments.to_vec(), depth)
    }

    fn lookup_absolute(&self, absolute: Vec<String>, depth: usize) -> (Resolved<'_>, String) {
        let path = join_path(&absolute);
        if let Some(item) = self.items.get(&path) {
            return (Resolved::Item(item), path);
        }

        // Follow `pub use` re-exports: `crate::Person` -> `crate::models::Person`
        if let Some((last, parent)) = absolute.split_last()
            && !parent.is_empty()
        {
            let parent_module = join_path(parent);
            if self
                .scopes
                .get(&parent_module)
                .is_some_and(|s| s.imports.contains_key(last))
                && let (Resolved::Item(item), resolved) =
                    self.resolve_in(&parent_module, std::slice::from_ref(last), depth + 1)
            {
                return (Resolved::Item(item), resolved);
            }
        }

        (Resolved::External, path)
    }

    /// Find the item a root type handle refers to.
    ///
    /// Tries, in order: resolution relative to the crate root, the same path
    /// with its first segment replaced by `crate` (which is how
    /// `std::any::type_name` spells local types), and a unique match on the
    /// last segment.
    pub fn find_root(&self, segments: &[String]) -> Result<&CatalogItem, String> {
        if let (Resolved::Item(item), _) = self.resolve("crate", segments) {
            return Ok(item);
        }

        if segments.len() > 1 {
            let mut crate_relative = vec!["crate".to_string()];
            crate_relative.extend_from_slice(&segments[1..]);
            if let (Resolved::Item(item), _) = self.resolve("crate", &crate_relative) {
                return Ok(item);
            }
        }

        let Some(ident) = segments.last() else {
            return Err("empty path".to_string());
        };
        let matches: Vec<&CatalogItem> =
            self.items.values().filter(|item| &item.ident == ident).collect();
        match matches.as_slice() {
            [item] => Ok(item),
            [] => Err("no such type in the scanned sources".to_string()),
            _ => {
                let candidates: Vec<&str> = matches.iter().map(|i| i.path.as_str()).collect();
                Err(format!("ambiguous name, matches {}", candidates.join(", ")))
            }
        }
    }
}
