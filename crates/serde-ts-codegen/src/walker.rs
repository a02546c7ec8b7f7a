//! Type graph walk: root records -> every reachable record, once each.

use std::collections::HashSet;

use tracing::debug;

use crate::naming::NamingPolicy;
use crate::resolver::Resolver;
use crate::types::{RecordDescriptor, RecordId};

/// Discovers records reachable from a set of roots.
///
/// A record is marked visited before its fields are followed, so
/// self-referential and mutually recursive records terminate. Visiting a
/// record that was already seen (including a duplicated root) emits nothing.
pub struct Walker<'a> {
    resolver: Resolver<'a>,
    naming: NamingPolicy<'a>,
    visited: HashSet<RecordId>,
}

impl<'a> Walker<'a> {
    pub fn new(resolver: Resolver<'a>, naming: NamingPolicy<'a>) -> Self {
        Self {
            resolver,
            naming,
            visited: HashSet::new(),
        }
    }

    /// Walk `roots` in order and return the discovered records.
    ///
    /// Each root contributes a chunk ending in its own declaration. Records it
    /// discovers first are placed before it, the most recently discovered
    /// child first.
    pub fn walk(mut self, roots: &[RecordId]) -> Vec<RecordDescriptor> {
        let mut records = Vec::new();
        for root in roots {
            records.extend(self.visit(root));
        }
        records
    }

    fn visit(&mut self, id: &RecordId) -> Vec<RecordDescriptor> {
        if !self.visited.insert(id.clone()) {
            return Vec::new();
        }
        let Some(item) = self.resolver.catalog().get(id.as_str()) else {
            return Vec::new();
        };
        debug!(record = %id, "resolving record");

        let fields = self.resolver.resolve_fields(item);
        let mut chunk = Vec::new();
        for field in &fields {
            if field.type_override.is_some() {
                continue;
            }
            if let Some((child, _)) = field.kind.record_target() {
                let mut discovered = self.visit(child);
                discovered.append(&mut chunk);
                chunk = discovered;
            }
        }

        chunk.push(RecordDescriptor {
            id: id.clone(),
            display_name: self.naming.display_name(self.resolver.declared_name(item)),
            fields,
        });
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;
    use crate::options::ConversionOptions;
    use crate::registry::TypeRegistry;

    const SOURCE: &str = r#"
        use std::collections::HashMap;

        struct Dummy { something: String }
        struct HasName { name: String }
        struct Address { duration: f64, text: Option<String> }
        struct Person {
            #[serde(flatten)]
            has_name: HasName,
            nicknames: Vec<String>,
            addresses: Vec<Address>,
            address: Option<Box<Address>>,
            metadata: HashMap<String, String>,
            friends: Vec<Person>,
            #[serde(rename = "a")]
            dummy: Dummy,
        }
        struct Tree { children: Vec<Vec<Tree>>, parent: Option<Box<Tree>> }
        struct Clock { #[ts(type = "Date")] time: Dummy }
    "#;

    fn walk(roots: &[&str]) -> Vec<String> {
        let mut catalog = TypeCatalog::new();
        catalog.add_source_str(SOURCE).unwrap();
        let registry = TypeRegistry::with_builtins();
        let options = ConversionOptions::default();
        let roots: Vec<RecordId> = roots
            .iter()
            .map(|r| RecordId::new(format!("crate::{r}")))
            .collect();
        Walker::new(
            Resolver::new(&catalog, &registry),
            NamingPolicy::new(&options),
        )
        .walk(&roots)
        .into_iter()
        .map(|r| r.display_name)
        .collect()
    }

    #[test]
    fn test_children_precede_parent() {
        assert_eq!(walk(&["Person"]), ["Dummy", "Address", "Person"]);
    }

    #[test]
    fn test_registration_order_of_roots() {
        assert_eq!(walk(&["Dummy", "Person"]), ["Dummy", "Address", "Person"]);
        assert_eq!(walk(&["Address", "Dummy"]), ["Address", "Dummy"]);
    }

    #[test]
    fn test_duplicate_roots_are_noops() {
        assert_eq!(walk(&["Person", "Person", "Dummy"]), walk(&["Person"]));
    }

    #[test]
    fn test_self_reference_terminates() {
        assert_eq!(walk(&["Tree"]), ["Tree"]);
    }

    #[test]
    fn test_override_stops_recursion() {
        assert_eq!(walk(&["Clock"]), ["Clock"]);
    }

    #[test]
    fn test_flattened_record_is_not_declared() {
        assert!(!walk(&["Person"]).contains(&"HasName".to_string()));
    }
}
