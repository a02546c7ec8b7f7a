//! Declaration emitter: one `interface` block per record.

use std::collections::HashMap;
use std::fmt::Write;

use crate::mapper::TypeMapper;
use crate::naming::{NamingPolicy, accessor, member, property_key};
use crate::options::ConversionOptions;
use crate::types::{FieldDescriptor, RecordDescriptor, VALUE_PLACEHOLDER};

/// Renders declarations and their `createFrom` routines.
pub struct Emitter<'a> {
    options: &'a ConversionOptions,
    naming: NamingPolicy<'a>,
    mapper: TypeMapper<'a>,
    custom_code: Option<&'a HashMap<String, String>>,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a ConversionOptions, mapper: TypeMapper<'a>) -> Self {
        Self {
            options,
            naming: NamingPolicy::new(options),
            mapper,
            custom_code: None,
        }
    }

    /// Emit a `//[Name:]` ... `//[end]` block in every declaration, filled
    /// from `custom_code` (keyed by display name).
    pub fn with_custom_code(mut self, custom_code: &'a HashMap<String, String>) -> Self {
        self.custom_code = Some(custom_code);
        self
    }

    pub fn emit(&self, record: &RecordDescriptor) -> String {
        let indent = &self.options.indent;
        let name = &record.display_name;
        let mut out = String::new();

        let _ = writeln!(out, "{}interface {name} {{", self.naming.export_keyword());
        for field in &record.fields {
            let _ = writeln!(
                out,
                "{indent}{}{}: {};",
                property_key(&field.name),
                if field.nullable { "?" } else { "" },
                self.mapper.map_field(field)
            );
        }

        if self.options.emit_reconstruction_routines {
            let body = indent.repeat(2);
            out.push('\n');
            let _ = writeln!(out, "{indent}static createFrom(source: any) {{");
            let _ = writeln!(
                out,
                "{body}if ('string' === typeof source) source = JSON.parse(source);"
            );
            let _ = writeln!(out, "{body}const result = new {name}();");
            for field in &record.fields {
                let _ = writeln!(
                    out,
                    "{body}{} = {};",
                    member("result", &field.name),
                    self.reconstruction(field)
                );
            }
            let _ = writeln!(out, "{body}return result;");
            let _ = writeln!(out, "{indent}}}");
            out.push('\n');
        }

        if let Some(custom_code) = self.custom_code {
            let code = custom_code.get(name).map(String::as_str).unwrap_or_default();
            let _ = write!(out, "{indent}//[{name}:]\n{code}\n\n{indent}//[end]\n");
        }

        out.push('}');
        out
    }

    /// Right-hand side of the assignment for one field.
    fn reconstruction(&self, field: &FieldDescriptor) -> String {
        let raw = accessor("source", &field.name);

        if let Some(template) = &field.transform {
            return template.replace(VALUE_PLACEHOLDER, &raw);
        }
        if field.type_override.is_some() {
            return raw;
        }

        match field.kind.record_target() {
            Some((id, 0)) => {
                let target = self.mapper.record_name(id);
                format!("{raw} ? {target}.createFrom({raw}) : null")
            }
            Some((id, depth)) => {
                let target = self.mapper.record_name(id);
                format!("{raw} ? {} : null", map_elements(&raw, &target, depth))
            }
            None => raw,
        }
    }
}

/// `value.map(...)` nested once per slice level around `Target.createFrom`.
fn map_elements(value: &str, target: &str, depth: usize) -> String {
    let inner = if depth > 1 {
        map_elements("element", target, depth - 1)
    } else {
        format!("{target}.createFrom(element)")
    };
    format!("{value}.map(function(element: any) {{ return {inner}; }})")
}
