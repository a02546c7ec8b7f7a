//! Type registry for mapping Rust type paths to serde wire shapes.
//!
//! The registry provides a data-driven way to teach the resolver how
//! std and external crate types serialize under serde. Built-in mappings
//! for the common crates are registered automatically, and users can add
//! custom mappings.

use std::collections::HashMap;

/// How a non-record type serializes, in terms the resolver can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Number,
    Text,
    Boolean,
    /// Transparent wrapper around its first type argument (`Option<T>`, `Box<T>`).
    Pointer,
    /// Sequence of its first type argument (`Vec<T>`, `HashSet<T>`).
    ///
    /// An array argument is unwrapped, so `SmallVec<[T; N]>` is a sequence of `T`.
    Sequence,
    /// Key-value map; keys and values are not inspected.
    Map,
    /// Raw byte buffer.
    Bytes,
    /// No structural guarantees (`serde_json::Value`).
    Dynamic,
}

/// A registry of fully-qualified Rust type path -> [`Builtin`] associations.
///
/// Paths are matched after `use` resolution, so `use std::collections::HashMap
/// as Map;` followed by a `Map<K, V>` field is looked up as
/// `"std::collections::HashMap"`. Prelude names (`Vec`, `Option`, `Box`,
/// `String`) and primitives are registered under their bare names too, and
/// the `core`/`alloc` spellings produced by `std::any::type_name` are
/// registered for the wrappers.
///
/// # Built-in mappings
///
/// | Rust type | Shape |
/// |-----------|-------|
/// | integers, floats | `Number` |
/// | `bool` | `Boolean` |
/// | `char`, `str`, `String`, `SmolStr`, `Uuid`, `PathBuf`, `Url`, chrono dates | `Text` |
/// | `Option`, `Box`, `Rc`, `Arc`, `Cow`, `Cell`, `RefCell` | `Pointer` |
/// | `Vec`, `VecDeque`, `LinkedList`, `HashSet`, `BTreeSet`, `IndexSet`, `SmallVec`, `ThinVec` | `Sequence` |
/// | `HashMap`, `BTreeMap`, `IndexMap`, `serde_json::Map` | `Map` |
/// | `bytes::Bytes`, `serde_bytes::ByteBuf` | `Bytes` |
/// | `serde_json::Value` | `Dynamic` |
///
/// # Custom mappings
///
/// ```
/// use serde_ts_codegen::registry::{Builtin, TypeRegistry};
///
/// let mut registry = TypeRegistry::with_builtins();
/// registry.register("rust_decimal::Decimal", Builtin::Text);
/// assert_eq!(registry.get("rust_decimal::Decimal"), Some(Builtin::Text));
/// ```
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    mappings: HashMap<String, Builtin>,
}

impl TypeRegistry {
    /// Create an empty registry with no mappings.
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with all built-in mappings.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register all built-in mappings.
    pub fn register_builtins(&mut self) {
        for name in [
            "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
            "isize", "f32", "f64",
        ] {
            self.register(name, Builtin::Number);
        }
        for name in [
            "std::num::NonZeroU8",
            "std::num::NonZeroU16",
            "std::num::NonZeroU32",
            "std::num::NonZeroU64",
            "std::num::NonZeroUsize",
            "std::num::NonZeroI32",
            "std::num::NonZeroI64",
        ] {
            self.register(name, Builtin::Number);
        }

        self.register("bool", Builtin::Boolean);

        for name in [
            "char",
            "str",
            "String",
            "std::string::String",
            "alloc::string::String",
            "std::path::PathBuf",
            "std::path::Path",
            "std::net::IpAddr",
            "std::net::Ipv4Addr",
            "std::net::Ipv6Addr",
            "std::net::SocketAddr",
            "smol_str::SmolStr",
            "uuid::Uuid",
            "url::Url",
            "chrono::DateTime",
            "chrono::NaiveDate",
            "chrono::NaiveTime",
            "chrono::NaiveDateTime",
        ] {
            self.register(name, Builtin::Text);
        }

        // Wrappers that serialize as their contents
        for name in [
            "Option",
            "std::option::Option",
            "core::option::Option",
            "Box",
            "std::boxed::Box",
            "alloc::boxed::Box",
            "std::rc::Rc",
            "alloc::rc::Rc",
            "std::sync::Arc",
            "alloc::sync::Arc",
            "triomphe::Arc",
            "std::borrow::Cow",
            "alloc::borrow::Cow",
            "std::cell::Cell",
            "std::cell::RefCell",
        ] {
            self.register(name, Builtin::Pointer);
        }

        for name in [
            "Vec",
            "std::vec::Vec",
            "alloc::vec::Vec",
            "std::collections::VecDeque",
            "std::collections::LinkedList",
            "std::collections::HashSet",
            "std::collections::BTreeSet",
            "std::collections::BinaryHeap",
            "hashbrown::HashSet",
            "indexmap::IndexSet",
            "smallvec::SmallVec",
            "thin_vec::ThinVec",
            "arrayvec::ArrayVec",
            "tinyvec::TinyVec",
        ] {
            self.register(name, Builtin::Sequence);
        }

        for name in [
            "std::collections::HashMap",
            "std::collections::BTreeMap",
            "hashbrown::HashMap",
            "indexmap::IndexMap",
            "serde_json::Map",
        ] {
            self.register(name, Builtin::Map);
        }

        for name in ["bytes::Bytes", "bytes::BytesMut", "serde_bytes::ByteBuf"] {
            self.register(name, Builtin::Bytes);
        }

        self.register("serde_json::Value", Builtin::Dynamic);
    }

    /// Register a shape for a fully-qualified Rust type path.
    ///
    /// The name should be the full module path of the type
    /// (e.g., `"uuid::Uuid"`, `"std::collections::HashMap"`).
    /// If a mapping already exists for this path, it is replaced.
    pub fn register(&mut self, name: impl Into<String>, builtin: Builtin) {
        self.mappings.insert(name.into(), builtin);
    }

    /// Look up the shape for a fully-qualified Rust type path.
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.mappings.get(name).copied()
    }

    /// Check if a type path is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }

    /// Remove a type mapping.
    pub fn unregister(&mut self, name: &str) -> Option<Builtin> {
        self.mappings.remove(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_builtins() {
        let registry = TypeRegistry::with_builtins();
        assert!(registry.contains("uuid::Uuid"));
        assert!(registry.contains("bytes::Bytes"));
        assert!(registry.contains("std::collections::HashMap"));
        assert!(registry.contains("Vec"));
        assert!(registry.contains("Option"));
        assert!(!registry.contains("NonExistent"));
    }

    #[test]
    fn test_builtin_shapes() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(registry.get("u64"), Some(Builtin::Number));
        assert_eq!(registry.get("bool"), Some(Builtin::Boolean));
        assert_eq!(registry.get("String"), Some(Builtin::Text));
        assert_eq!(registry.get("chrono::DateTime"), Some(Builtin::Text));
        assert_eq!(registry.get("std::sync::Arc"), Some(Builtin::Pointer));
        assert_eq!(registry.get("indexmap::IndexSet"), Some(Builtin::Sequence));
        assert_eq!(registry.get("indexmap::IndexMap"), Some(Builtin::Map));
        assert_eq!(registry.get("serde_bytes::ByteBuf"), Some(Builtin::Bytes));
        assert_eq!(registry.get("serde_json::Value"), Some(Builtin::Dynamic));
    }

    #[test]
    fn test_registry_custom_type() {
        let mut registry = TypeRegistry::new();
        registry.register("my_crate::Money", Builtin::Text);
        assert_eq!(registry.get("my_crate::Money"), Some(Builtin::Text));
        assert_eq!(registry.get("String"), None);
    }

    #[test]
    fn test_registry_override_builtin() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register("uuid::Uuid", Builtin::Dynamic);
        assert_eq!(registry.get("uuid::Uuid"), Some(Builtin::Dynamic));
    }

    #[test]
    fn test_registry_unregister() {
        let mut registry = TypeRegistry::with_builtins();
        assert!(registry.contains("uuid::Uuid"));
        assert_eq!(registry.unregister("uuid::Uuid"), Some(Builtin::Text));
        assert!(!registry.contains("uuid::Uuid"));
    }
}
