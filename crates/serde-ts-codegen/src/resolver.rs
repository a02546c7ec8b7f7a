//! Type descriptor resolution: catalogued structs -> normalized field lists.
//!
//! Field types are classified into [`FieldKind`]s by resolving their paths
//! against the declaring module's scope. Catalogued items are classified by
//! shape; everything else goes through the [`TypeRegistry`]. Types that match
//! neither fall back to [`FieldKind::Dynamic`] with a warning.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::catalog::{CatalogItem, ItemShape, Resolved, TypeCatalog};
use crate::error::{Error, Result};
use crate::extractor::type_expr;
use crate::registry::{Builtin, TypeRegistry};
use crate::types::{FieldDescriptor, FieldKind, Primitive, RecordId, TypeExpr};

const ROOT_MODULE: &str = "crate";

/// Spellings of `Option` after import resolution.
const OPTION_PATHS: &[&str] = &["Option", "std::option::Option", "core::option::Option"];

/// Resolves records and classifies field types against a catalog.
///
/// Borrows its inputs immutably, so any number of resolvers can share one
/// catalog and registry across threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a TypeCatalog,
    registry: &'a TypeRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a TypeCatalog, registry: &'a TypeRegistry) -> Self {
        Self { catalog, registry }
    }

    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    /// Resolve a root type handle to the record it names.
    ///
    /// Pointer and sequence layers and type aliases are unwrapped, so
    /// `Vec<Box<Person>>`, `&[Person]` and `Option<Person>` all name `Person`.
    /// Anything that does not end in a struct with named fields is
    /// [`Error::InvalidRootType`].
    pub fn resolve_root(&self, handle: &str) -> Result<RecordId> {
        let invalid = |reason: String| Error::InvalidRootType {
            handle: handle.to_string(),
            reason,
        };

        let parsed = syn::parse_str::<syn::Type>(handle)
            .map_err(|e| invalid(format!("not a type expression ({e})")))?;
        let mut ty = type_expr(&parsed);
        let mut module = ROOT_MODULE.to_string();
        let mut aliases: Vec<String> = Vec::new();

        loop {
            let (segments, mut args) = match ty {
                TypeExpr::Reference(inner) | TypeExpr::Array(inner) => {
                    ty = *inner;
                    continue;
                }
                TypeExpr::Path { segments, args } => (segments, args),
                TypeExpr::Tuple(_) => return Err(invalid("tuples are not records".to_string())),
                TypeExpr::Opaque => return Err(invalid("not a nameable type".to_string())),
            };

            let item = match self.catalog.resolve(&module, &segments) {
                (Resolved::Item(item), _) => item,
                (Resolved::External, path) => {
                    let wrapper = matches!(
                        self.registry.get(&path),
                        Some(Builtin::Pointer | Builtin::Sequence)
                    );
                    if wrapper && !args.is_empty() {
                        ty = args.swap_remove(0);
                        continue;
                    }
                    self.catalog.find_root(&segments).map_err(invalid)?
                }
            };

            match &item.shape {
                ItemShape::Alias(target) if !aliases.contains(&item.path) => {
                    aliases.push(item.path.clone());
                    module = item.module.clone();
                    ty = target.clone();
                }
                ItemShape::Record(_) if item.attrs.transparent => {
                    return Err(invalid(format!(
                        "`{}` is #[serde(transparent)]",
                        item.path
                    )));
                }
                ItemShape::Record(_) => return Ok(RecordId::new(&item.path)),
                ItemShape::Enum => {
                    return Err(invalid(format!("`{}` is an enum", item.path)));
                }
                ItemShape::Alias(_) => {
                    return Err(invalid(format!("`{}` is a recursive type alias", item.path)));
                }
                _ => {
                    return Err(invalid(format!(
                        "`{}` is not a struct with named fields",
                        item.path
                    )));
                }
            }
        }
    }

    /// The name a record is declared under, before prefix and suffix.
    pub fn declared_name(&self, item: &'a CatalogItem) -> &'a str {
        item.attrs.ts_rename.as_deref().unwrap_or(&item.ident)
    }

    /// Normalize the fields of a record item.
    ///
    /// Skipped fields and fields renamed to `""` are dropped, `flatten`ed
    /// records are inlined at the point of embedding, and the container's
    /// `rename_all` rule applies to fields without an explicit name. Fields
    /// inlined from a flattened `Option` are nullable.
    pub fn resolve_fields(&self, item: &CatalogItem) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();
        let mut flattening = vec![item.path.clone()];
        self.collect_fields(item, false, &mut fields, &mut flattening);
        fields
    }

    fn collect_fields(
        &self,
        item: &CatalogItem,
        optional: bool,
        out: &mut Vec<FieldDescriptor>,
        flattening: &mut Vec<String>,
    ) {
        let ItemShape::Record(defs) = &item.shape else {
            return;
        };

        for def in defs {
            let attrs = &def.attrs;
            if attrs.skip {
                continue;
            }

            if attrs.flatten {
                match self.flatten_target(item, &def.ty, &mut Vec::new()) {
                    Some((target, _)) if flattening.contains(&target.path) => {
                        warn!(record = %item.path, field = %def.ident, "recursive flatten, skipped");
                    }
                    Some((target, nested_optional)) => {
                        flattening.push(target.path.clone());
                        let optional = optional || nested_optional;
                        self.collect_fields(target, optional, out, flattening);
                        flattening.pop();
                    }
                    None => {
                        warn!(
                            record = %item.path,
                            field = %def.ident,
                            "flattened field is not a record, skipped"
                        );
                    }
                }
                continue;
            }

            let name = match (&attrs.rename, item.attrs.rename_all) {
                (Some(name), _) => name.clone(),
                (None, Some(rule)) => rule.apply_to_field(&def.ident),
                (None, None) => def.ident.clone(),
            };
            if name.is_empty() {
                debug!(record = %item.path, field = %def.ident, "empty serialized name, excluded");
                continue;
            }

            let kind = if attrs.custom_serde {
                FieldKind::Dynamic
            } else {
                self.classify(item, &def.ty)
            };

            let mut field =
                FieldDescriptor::new(name, kind).nullable(attrs.omit_empty || optional);
            field.type_override = attrs.type_override.clone();
            field.transform = attrs.transform.clone();
            out.push(field);
        }
    }

    /// The record a `flatten` field of `owner` embeds, through pointer layers
    /// and aliases, and whether an `Option` wraps it.
    fn flatten_target(
        &self,
        owner: &CatalogItem,
        ty: &TypeExpr,
        aliases: &mut Vec<String>,
    ) -> Option<(&'a CatalogItem, bool)> {
        match ty {
            TypeExpr::Reference(inner) => self.flatten_target(owner, inner, aliases),
            TypeExpr::Path { segments, args } => {
                match self.catalog.resolve(&owner.module, &self.expand_self(owner, segments)) {
                    (Resolved::Item(item), _) => match &item.shape {
                        ItemShape::Record(_) if self.is_wire_record(item) => Some((item, false)),
                        ItemShape::Alias(target) if !aliases.contains(&item.path) => {
                            aliases.push(item.path.clone());
                            self.flatten_target(item, target, aliases)
                        }
                        _ => None,
                    },
                    (Resolved::External, path)
                        if self.registry.get(&path) == Some(Builtin::Pointer) =>
                    {
                        let (target, optional) =
                            self.flatten_target(owner, args.first()?, aliases)?;
                        Some((target, optional || OPTION_PATHS.contains(&path.as_str())))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Classify a field type declared inside `owner`.
    ///
    /// `Self` refers to `owner`.
    pub fn classify(&self, owner: &CatalogItem, ty: &TypeExpr) -> FieldKind {
        self.classify_in(owner, ty, &mut Vec::new())
    }

    fn classify_in(
        &self,
        owner: &CatalogItem,
        ty: &TypeExpr,
        transparent: &mut Vec<String>,
    ) -> FieldKind {
        match ty {
            TypeExpr::Reference(inner) => {
                FieldKind::pointer(self.classify_in(owner, inner, transparent))
            }
            TypeExpr::Array(elem) => self.sequence_of(owner, elem, transparent),
            TypeExpr::Tuple(_) | TypeExpr::Opaque => FieldKind::Dynamic,
            TypeExpr::Path { segments, args } => {
                match self.catalog.resolve(&owner.module, &self.expand_self(owner, segments)) {
                    (Resolved::Item(item), _) => self.classify_item(item, transparent),
                    (Resolved::External, path) => {
                        self.classify_external(owner, &path, args, transparent)
                    }
                }
            }
        }
    }

    /// Rewrite a leading `Self` to the path of `owner`.
    fn expand_self<'s>(
        &self,
        owner: &CatalogItem,
        segments: &'s [String],
    ) -> Cow<'s, [String]> {
        match segments.split_first() {
            Some((head, rest)) if head == "Self" => {
                let mut expanded: Vec<String> =
                    owner.path.split("::").map(str::to_string).collect();
                expanded.extend_from_slice(rest);
                Cow::Owned(expanded)
            }
            _ => Cow::Borrowed(segments),
        }
    }

    fn classify_item(&self, item: &CatalogItem, transparent: &mut Vec<String>) -> FieldKind {
        if self.has_custom_serde(item) {
            debug!(item = %item.path, "custom serde representation, using any");
            return FieldKind::Dynamic;
        }

        match &item.shape {
            ItemShape::Record(defs) if item.attrs.transparent => {
                let mut serialized = defs.iter().filter(|def| !def.attrs.skip);
                match (serialized.next(), serialized.next()) {
                    (Some(def), None) if !def.attrs.custom_serde => {
                        self.classify_through(item, &def.ty, transparent)
                    }
                    _ => {
                        warn!(
                            item = %item.path,
                            "transparent struct without a single plain field, using any"
                        );
                        FieldKind::Dynamic
                    }
                }
            }
            ItemShape::Record(_) => FieldKind::Record(RecordId::new(&item.path)),
            ItemShape::Newtype(inner) | ItemShape::Alias(inner) => {
                self.classify_through(item, inner, transparent)
            }
            ItemShape::Tuple | ItemShape::Unit | ItemShape::Enum => FieldKind::Dynamic,
        }
    }

    /// Classify the type `item` serializes as, guarding against cycles of
    /// newtypes, aliases and transparent structs.
    fn classify_through(
        &self,
        item: &CatalogItem,
        inner: &TypeExpr,
        transparent: &mut Vec<String>,
    ) -> FieldKind {
        if transparent.contains(&item.path) {
            warn!(item = %item.path, "recursive transparent type, using any");
            return FieldKind::Dynamic;
        }
        transparent.push(item.path.clone());
        let kind = self.classify_in(item, inner, transparent);
        transparent.pop();
        kind
    }

    fn classify_external(
        &self,
        owner: &CatalogItem,
        path: &str,
        args: &[TypeExpr],
        transparent: &mut Vec<String>,
    ) -> FieldKind {
        let Some(builtin) = self.registry.get(path) else {
            warn!(ty = %path, "unresolvable field type, using any");
            return FieldKind::Dynamic;
        };

        match builtin {
            Builtin::Number => FieldKind::Primitive(Primitive::Number),
            Builtin::Text => FieldKind::Primitive(Primitive::Text),
            Builtin::Boolean => FieldKind::Primitive(Primitive::Boolean),
            Builtin::Pointer => match args.first() {
                Some(inner) => FieldKind::pointer(self.classify_in(owner, inner, transparent)),
                None => FieldKind::Dynamic,
            },
            Builtin::Sequence => match args.first() {
                // `SmallVec<[T; N]>`
                Some(TypeExpr::Array(elem)) => self.sequence_of(owner, elem, transparent),
                Some(elem) => self.sequence_of(owner, elem, transparent),
                None => FieldKind::Dynamic,
            },
            Builtin::Map => FieldKind::Map,
            Builtin::Bytes => FieldKind::Bytes,
            Builtin::Dynamic => FieldKind::Dynamic,
        }
    }

    fn sequence_of(
        &self,
        owner: &CatalogItem,
        elem: &TypeExpr,
        transparent: &mut Vec<String>,
    ) -> FieldKind {
        if self.is_byte(owner, elem) {
            FieldKind::Bytes
        } else {
            FieldKind::slice(self.classify_in(owner, elem, transparent))
        }
    }

    fn is_byte(&self, owner: &CatalogItem, ty: &TypeExpr) -> bool {
        match ty {
            TypeExpr::Path { segments, args } if args.is_empty() => {
                matches!(self.catalog.resolve(&owner.module, segments), (Resolved::External, path) if path == "u8")
            }
            _ => false,
        }
    }

    /// A struct that serializes as a JSON object of its own fields.
    fn is_wire_record(&self, item: &CatalogItem) -> bool {
        item.is_record() && !item.attrs.transparent && !self.has_custom_serde(item)
    }

    fn has_custom_serde(&self, item: &CatalogItem) -> bool {
        item.attrs.custom_serde || self.catalog.has_custom_serde_impl(&item.path)
    }
}
