//! Conversion options.

use std::path::PathBuf;

use serde::Deserialize;

/// Options controlling the generated TypeScript.
///
/// Deserializable so front ends can load them from a config file; every key
/// is optional and uses kebab-case:
///
/// ```
/// use serde_ts_codegen::ConversionOptions;
///
/// let options: ConversionOptions = toml::from_str(r#"
///     name-prefix = "Api"
///     export-types = false
/// "#).unwrap();
/// assert_eq!(options.name_prefix, "Api");
/// assert!(!options.export_types);
/// assert!(options.emit_reconstruction_routines);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConversionOptions {
    /// Prepended to every declared type name.
    pub name_prefix: String,
    /// Appended to every declared type name.
    pub name_suffix: String,
    /// Emit `export interface` instead of `interface`.
    pub export_types: bool,
    /// Emit a `static createFrom(source: any)` routine per declaration.
    pub emit_reconstruction_routines: bool,
    /// One indentation level of the generated code.
    pub indent: String,
    /// Copy an existing output file aside before overwriting it.
    pub backup_before_overwrite: bool,
    /// Where backups go; defaults to the output file's directory.
    pub backup_dir: Option<PathBuf>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            name_prefix: String::new(),
            name_suffix: String::new(),
            export_types: true,
            emit_reconstruction_routines: true,
            indent: "    ".to_string(),
            backup_before_overwrite: true,
            backup_dir: None,
        }
    }
}
