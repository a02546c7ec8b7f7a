//! `#[serde(...)]` and `#[ts(...)]` attribute parsing.
//!
//! Only the keys that change a type's JSON shape are interpreted; everything
//! else (`default`, `bound`, `deny_unknown_fields`, ...) is ignored. Malformed
//! attributes are ignored as well, since rustc reports them on the real build.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Token};

/// Field-level attributes that shape the serialized form of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAttrs {
    /// `#[serde(rename = "..")]` or `#[serde(rename(serialize = ".."))]`.
    pub rename: Option<String>,
    /// `#[serde(skip)]` / `#[serde(skip_serializing)]`.
    pub skip: bool,
    /// `#[serde(skip_serializing_if = "..")]`.
    pub omit_empty: bool,
    /// `#[serde(flatten)]`.
    pub flatten: bool,
    /// `#[serde(with | serialize_with | deserialize_with = "..")]`.
    pub custom_serde: bool,
    /// `#[ts(type = "..")]`.
    pub type_override: Option<String>,
    /// `#[ts(transform = "..")]`.
    pub transform: Option<String>,
}

/// Struct-level attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerAttrs {
    /// `#[serde(rename_all = "..")]`.
    pub rename_all: Option<RenameRule>,
    /// `#[serde(into | from | try_from | remote = "..")]`: the wire shape is
    /// produced by another type.
    pub custom_serde: bool,
    /// `#[serde(transparent)]`: serialized as its single field.
    pub transparent: bool,
    /// `#[ts(rename = "..")]`: declared TypeScript name.
    pub ts_rename: Option<String>,
}

/// Serde's `rename_all` case conventions, applied to snake_case field idents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    pub fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::LowerCase,
            "UPPERCASE" => RenameRule::UpperCase,
            "PascalCase" => RenameRule::PascalCase,
            "camelCase" => RenameRule::CamelCase,
            "snake_case" => RenameRule::SnakeCase,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnakeCase,
            "kebab-case" => RenameRule::KebabCase,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebabCase,
            _ => return None,
        })
    }

    /// Apply the rule to a field identifier the same way serde does.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::LowerCase | RenameRule::SnakeCase => field.to_string(),
            RenameRule::UpperCase | RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
            RenameRule::PascalCase => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::CamelCase => {
                let pascal = RenameRule::PascalCase.apply_to_field(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::KebabCase => field.replace('_', "-"),
            RenameRule::ScreamingKebabCase => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

/// Parse the comma-separated metas inside `#[name(...)]` attributes.
fn nested_metas<'a>(
    attrs: &'a [Attribute],
    name: &'a str,
) -> impl Iterator<Item = Meta> + 'a {
    attrs
        .iter()
        .filter(move |attr| attr.path().is_ident(name))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
}

fn lit_str(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Some(s.value()),
        _ => None,
    }
}

/// `rename = ".."` or `rename(serialize = "..")`; the serialize side wins.
fn rename_value(meta: &Meta) -> Option<String> {
    match meta {
        Meta::NameValue(nv) => lit_str(&nv.value),
        Meta::List(list) => list
            .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            .ok()?
            .into_iter()
            .find_map(|inner| match inner {
                Meta::NameValue(nv) if nv.path.is_ident("serialize") => lit_str(&nv.value),
                _ => None,
            }),
        Meta::Path(_) => None,
    }
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> FieldAttrs {
    let mut parsed = FieldAttrs::default();

    for meta in nested_metas(attrs, "serde") {
        let path = meta.path();
        if path.is_ident("rename") {
            if let Some(name) = rename_value(&meta) {
                parsed.rename = Some(name);
            }
        } else if path.is_ident("skip") || path.is_ident("skip_serializing") {
            parsed.skip = true;
        } else if path.is_ident("skip_serializing_if") {
            parsed.omit_empty = true;
        } else if path.is_ident("flatten") {
            parsed.flatten = true;
        } else if path.is_ident("with")
            || path.is_ident("serialize_with")
            || path.is_ident("deserialize_with")
        {
            parsed.custom_serde = true;
        }
    }

    for meta in nested_metas(attrs, "ts") {
        if let Meta::NameValue(nv) = &meta {
            if nv.path.is_ident("type") {
                parsed.type_override = lit_str(&nv.value);
            } else if nv.path.is_ident("transform") {
                parsed.transform = lit_str(&nv.value);
            }
        }
    }

    parsed
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> ContainerAttrs {
    let mut parsed = ContainerAttrs::default();

    for meta in nested_metas(attrs, "serde") {
        let path = meta.path();
        if path.is_ident("rename_all") {
            parsed.rename_all = rename_value(&meta).as_deref().and_then(RenameRule::parse);
        } else if path.is_ident("into")
            || path.is_ident("from")
            || path.is_ident("try_from")
            || path.is_ident("remote")
        {
            parsed.custom_serde = true;
        } else if path.is_ident("transparent") {
            parsed.transparent = true;
        }
    }

    for meta in nested_metas(attrs, "ts") {
        if let Meta::NameValue(nv) = &meta
            && nv.path.is_ident("rename")
        {
            parsed.ts_rename = lit_str(&nv.value);
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_attrs(src: &str) -> FieldAttrs {
        let field: syn::Field = syn::parse_str::<syn::FieldsNamed>(&format!("{{ {src} x: u32 }}"))
            .unwrap()
            .named
            .into_iter()
            .next()
            .unwrap();
        parse_field_attrs(&field.attrs)
    }

    fn container_attrs(src: &str) -> ContainerAttrs {
        let item: syn::ItemStruct = syn::parse_str(&format!("{src} struct S {{}}")).unwrap();
        parse_container_attrs(&item.attrs)
    }

    #[test]
    fn test_rename_and_omit_empty() {
        let attrs = field_attrs(r#"#[serde(rename = "text", skip_serializing_if = "String::is_empty")]"#);
        assert_eq!(attrs.rename.as_deref(), Some("text"));
        assert!(attrs.omit_empty);
        assert!(!attrs.skip);
    }

    #[test]
    fn test_rename_serialize_side() {
        let attrs = field_attrs(r#"#[serde(rename(serialize = "out", deserialize = "in"))]"#);
        assert_eq!(attrs.rename.as_deref(), Some("out"));
    }

    #[test]
    fn test_skip_variants() {
        assert!(field_attrs("#[serde(skip)]").skip);
        assert!(field_attrs("#[serde(skip_serializing)]").skip);
        assert!(!field_attrs("#[serde(skip_deserializing)]").skip);
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let attrs = field_attrs(r#"#[serde(default, alias = "y", flatten)]"#);
        assert!(attrs.flatten);
        assert_eq!(attrs.rename, None);
    }

    #[test]
    fn test_custom_serde_field() {
        assert!(field_attrs(r#"#[serde(with = "ts_seconds")]"#).custom_serde);
        assert!(field_attrs(r#"#[serde(serialize_with = "ser")]"#).custom_serde);
    }

    #[test]
    fn test_ts_attributes() {
        let attrs = field_attrs(
            r#"#[ts(type = "Date", transform = "new Date(__VALUE__)")] #[serde(rename = "time")]"#,
        );
        assert_eq!(attrs.type_override.as_deref(), Some("Date"));
        assert_eq!(attrs.transform.as_deref(), Some("new Date(__VALUE__)"));
        assert_eq!(attrs.rename.as_deref(), Some("time"));
    }

    #[test]
    fn test_container_attrs() {
        let attrs = container_attrs(r#"#[serde(rename_all = "camelCase")] #[ts(rename = "User")]"#);
        assert_eq!(attrs.rename_all, Some(RenameRule::CamelCase));
        assert_eq!(attrs.ts_rename.as_deref(), Some("User"));
        assert!(!attrs.custom_serde);

        assert!(container_attrs(r#"#[serde(into = "String")]"#).custom_serde);
        assert!(container_attrs(r#"#[serde(remote = "Duration")]"#).custom_serde);
        assert!(container_attrs("#[serde(transparent)]").transparent);
        assert!(!container_attrs("#[serde(deny_unknown_fields)]").transparent);
    }

    #[test]
    fn test_rename_rules() {
        let field = "first_name_x";
        assert_eq!(RenameRule::LowerCase.apply_to_field(field), "first_name_x");
        assert_eq!(RenameRule::UpperCase.apply_to_field(field), "FIRST_NAME_X");
        assert_eq!(RenameRule::PascalCase.apply_to_field(field), "FirstNameX");
        assert_eq!(RenameRule::CamelCase.apply_to_field(field), "firstNameX");
        assert_eq!(RenameRule::KebabCase.apply_to_field(field), "first-name-x");
        assert_eq!(
            RenameRule::ScreamingKebabCase.apply_to_field(field),
            "FIRST-NAME-X"
        );
        assert_eq!(RenameRule::parse("snake_case"), Some(RenameRule::SnakeCase));
        assert_eq!(RenameRule::parse("Title Case"), None);
    }
}
