//! Naming and formatting policy for emitted declarations.

use std::borrow::Cow;

use crate::options::ConversionOptions;

/// Applies the configured prefix, suffix and export modifier.
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy<'a> {
    prefix: &'a str,
    suffix: &'a str,
    export: bool,
}

impl<'a> NamingPolicy<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            prefix: &options.name_prefix,
            suffix: &options.name_suffix,
            export: options.export_types,
        }
    }

    /// The emitted name for a record declared as `declared`.
    pub fn display_name(&self, declared: &str) -> String {
        format!("{}{declared}{}", self.prefix, self.suffix)
    }

    /// `"export "` or nothing.
    pub fn export_keyword(&self) -> &'static str {
        if self.export { "export " } else { "" }
    }
}

/// Whether `name` can be used unquoted as a property name and after `.`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Property key as written in a declaration: `name` or `"some-name"`.
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(quoted(name))
    }
}

/// Member access on `object`: `object.name` or `object["some-name"]`.
pub fn member(object: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{object}.{name}")
    } else {
        format!("{object}[{}]", quoted(name))
    }
}

/// Raw payload accessor, always bracketed: `object["name"]`.
pub fn accessor(object: &str, name: &str) -> String {
    format!("{object}[{}]", quoted(name))
}
