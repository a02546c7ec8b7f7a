//! Field kind -> TypeScript type expression.

use std::collections::HashMap;

use crate::types::{FieldDescriptor, FieldKind, Primitive, RecordId};

pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
pub const ANY: &str = "any";
/// Byte buffers have no structural mapping without an override.
pub const OPAQUE_OBJECT: &str = "{[key: string]: any}";

/// Maps field kinds to type expressions, resolving record references
/// through the display names of the walked records.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    names: &'a HashMap<RecordId, String>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(names: &'a HashMap<RecordId, String>) -> Self {
        Self { names }
    }

    /// Type expression for a field; a literal override wins over its kind.
    pub fn map_field(&self, field: &FieldDescriptor) -> String {
        match &field.type_override {
            Some(literal) => literal.clone(),
            None => self.map_kind(&field.kind),
        }
    }

    pub fn map_kind(&self, kind: &FieldKind) -> String {
        match kind {
            FieldKind::Primitive(Primitive::Number) => NUMBER.to_string(),
            FieldKind::Primitive(Primitive::Text) => STRING.to_string(),
            FieldKind::Primitive(Primitive::Boolean) => BOOLEAN.to_string(),
            FieldKind::Record(id) => self.record_name(id),
            FieldKind::Pointer(inner) => self.map_kind(inner),
            FieldKind::Slice(inner) => format!("{}[]", self.map_kind(inner)),
            FieldKind::Bytes => OPAQUE_OBJECT.to_string(),
            FieldKind::Map | FieldKind::Dynamic => ANY.to_string(),
        }
    }

    /// Display name of a walked record.
    pub fn record_name(&self, id: &RecordId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.ident().to_string())
    }
}
