//! Type definitions for the code generator.

use std::fmt;

/// Identity of a record type: its fully-qualified item path.
///
/// Two structs named `Person` in different modules are different records
/// (`crate::a::Person` vs `crate::b::Person`), even though both end up
/// declared under the same TypeScript name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment, i.e. the declared struct name.
    pub fn ident(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scalar JSON value classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Number,
    Text,
    Boolean,
}

/// Structural classification of a field's value type.
///
/// Produced once per field by the resolver; the mapper and the emitter only
/// ever pattern-match on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Primitive(Primitive),
    /// Reference to another record.
    Record(RecordId),
    /// `Option<T>`, `Box<T>`, `Arc<T>`, `&T`, ...
    Pointer(Box<FieldKind>),
    /// `Vec<T>`, `[T; N]`, `HashSet<T>`, ...
    Slice(Box<FieldKind>),
    /// Key-value maps.
    Map,
    /// Raw byte buffers.
    Bytes,
    /// Anything without structural guarantees.
    Dynamic,
}

impl FieldKind {
    pub fn pointer(inner: FieldKind) -> Self {
        FieldKind::Pointer(Box::new(inner))
    }

    pub fn slice(inner: FieldKind) -> Self {
        FieldKind::Slice(Box::new(inner))
    }

    /// The record reached through any mix of pointer and slice layers,
    /// together with the number of slice levels wrapping it.
    pub fn record_target(&self) -> Option<(&RecordId, usize)> {
        match self {
            FieldKind::Record(id) => Some((id, 0)),
            FieldKind::Pointer(inner) => inner.record_target(),
            FieldKind::Slice(inner) => inner.record_target().map(|(id, depth)| (id, depth + 1)),
            FieldKind::Primitive(_) | FieldKind::Map | FieldKind::Bytes | FieldKind::Dynamic => {
                None
            }
        }
    }
}

/// A normalized field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Serialized (wire) name, also used as the TypeScript property name.
    pub name: String,
    /// Rendered with the optional-field marker.
    pub nullable: bool,
    pub kind: FieldKind,
    /// Literal TypeScript type expression from `#[ts(type = "...")]`.
    ///
    /// When present it is emitted verbatim and the walker does not recurse
    /// into the field's structural kind.
    pub type_override: Option<String>,
    /// Reconstruction template from `#[ts(transform = "...")]`, containing
    /// [`VALUE_PLACEHOLDER`].
    pub transform: Option<String>,
}

/// Placeholder substituted with the raw accessor inside transform templates.
pub const VALUE_PLACEHOLDER: &str = "__VALUE__";

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            kind,
            type_override: None,
            transform: None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_override(mut self, type_expr: impl Into<String>) -> Self {
        self.type_override = Some(type_expr.into());
        self
    }

    pub fn with_transform(mut self, template: impl Into<String>) -> Self {
        self.transform = Some(template.into());
        self
    }
}

/// A record discovered by the walker, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub id: RecordId,
    /// Declared name after the naming policy (prefix/suffix) is applied.
    pub display_name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// A Rust type expression as written in source, before name resolution.
///
/// Paths keep their segments verbatim (`HashMap`, `std::collections::HashMap`,
/// `super::Inner`); the catalog resolves them against the scope of the module
/// that declared the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A path with the generic type arguments of its last segment.
    Path {
        segments: Vec<String>,
        args: Vec<TypeExpr>,
    },
    /// `[T; N]`, `[T]`
    Array(Box<TypeExpr>),
    /// `&T`, `&mut T`, `*const T`
    Reference(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// `dyn Trait`, `impl Trait`, `fn(..)`, macros, `_`.
    Opaque,
}

impl TypeExpr {
    /// A path without generic arguments, split on `::`.
    pub fn path(path: &str) -> Self {
        TypeExpr::Path {
            segments: path.split("::").map(str::to_string).collect(),
            args: Vec::new(),
        }
    }

    /// A path with generic arguments.
    pub fn generic(path: &str, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Path {
            segments: path.split("::").map(str::to_string).collect(),
            args,
        }
    }
}
