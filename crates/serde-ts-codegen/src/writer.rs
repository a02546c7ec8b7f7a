//! Writing generated code to disk.
//!
//! An existing output file is mined for hand-written `//[Name:]` ... `//[end]`
//! sections before it is replaced, and optionally copied aside first.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::error::Result;
use crate::options::ConversionOptions;

/// Header written when no custom header is configured.
pub const DEFAULT_HEADER: &str = "/* Do not change, this code is generated from Rust structs */";

const BACKUP_TIMESTAMP: &str = "%Y-%m-%dT%H_%M_%S%.3f";
const CUSTOM_CODE_END: &str = "//[end]";

/// The comment opening a generated file, followed by a blank line.
pub fn header_comment(header: Option<&str>) -> String {
    match header {
        Some(header) => {
            let mut comment = String::from("/**\n");
            for line in header.lines() {
                comment.push_str(" * ");
                comment.push_str(line);
                comment.push('\n');
            }
            comment.push_str(" */\n\n");
            comment
        }
        None => format!("{DEFAULT_HEADER}\n\n"),
    }
}

/// Extract hand-written sections keyed by the name in their `//[Name:]` line.
///
/// The marker lines are dropped and trailing whitespace is trimmed from each
/// section, so code survives repeated regeneration unchanged.
pub fn load_custom_code(text: &str) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some((name, lines)) = current.take() {
            if trimmed == CUSTOM_CODE_END {
                sections.insert(name, lines.join("\n").trim_end().to_string());
            } else {
                let mut lines = lines;
                lines.push(line);
                current = Some((name, lines));
            }
        } else if let Some(name) = trimmed
            .strip_prefix("//[")
            .and_then(|rest| rest.strip_suffix(":]"))
        {
            current = Some((name.to_string(), Vec::new()));
        }
    }

    sections
}

/// Where a backup of `path` taken at `at` goes.
pub fn backup_path(path: &Path, backup_dir: Option<&Path>, at: DateTime<Local>) -> PathBuf {
    let dir = match backup_dir {
        Some(dir) => dir.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{file_name}-{}.backup", at.format(BACKUP_TIMESTAMP)))
}

fn read_existing(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Convert and write to `path`.
///
/// Custom code sections of the current file are handed to `convert`. Nothing
/// is touched on disk unless `convert` succeeds; then the old file is backed
/// up (if configured) and replaced by `header` plus the converted text.
pub fn write_file<F>(
    path: &Path,
    options: &ConversionOptions,
    header: Option<&str>,
    convert: F,
) -> Result<()>
where
    F: FnOnce(&HashMap<String, String>) -> Result<String>,
{
    let existing = read_existing(path)?;
    let custom_code = existing.as_deref().map(load_custom_code).unwrap_or_default();
    debug!(sections = custom_code.len(), path = %path.display(), "loaded custom code");

    let code = convert(&custom_code)?;

    if existing.is_some() && options.backup_before_overwrite {
        let backup = backup_path(path, options.backup_dir.as_deref(), Local::now());
        if let Some(dir) = backup.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::copy(path, &backup)?;
        info!(backup = %backup.display(), "backed up previous output");
    }

    let mut contents = header_comment(header);
    contents.push_str(&code);
    fs::write(path, contents)?;
    info!(path = %path.display(), "wrote TypeScript declarations");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_header_comment() {
        assert_eq!(
            header_comment(None),
            "/* Do not change, this code is generated from Rust structs */\n\n"
        );
        assert_eq!(
            header_comment(Some("Generated\nby hand")),
            "/**\n * Generated\n * by hand\n */\n\n"
        );
    }

    #[test]
    fn test_load_custom_code() {
        let text = "export interface A {\n    x: string;\n    //[A:]\n    greet() {}   \n\n    //[end]\n}\nexport interface B {\n    //[B:]\n\n\n    //[end]\n}\n";
        let sections = load_custom_code(text);
        assert_eq!(sections["A"], "    greet() {}");
        assert_eq!(sections["B"], "");
    }

    #[test]
    fn test_load_custom_code_unterminated() {
        let sections = load_custom_code("//[A:]\nfoo\n");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_backup_path() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            backup_path(Path::new("out/models.ts"), None, at),
            PathBuf::from("out/models.ts-2024-03-09T14_05_07.000.backup")
        );
        assert_eq!(
            backup_path(Path::new("out/models.ts"), Some(Path::new("bak")), at),
            PathBuf::from("bak/models.ts-2024-03-09T14_05_07.000.backup")
        );
    }

    #[test]
    fn test_write_file_round_trips_custom_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.ts");
        let options = ConversionOptions {
            backup_dir: Some(dir.path().join("backups")),
            ..ConversionOptions::default()
        };

        write_file(&path, &options, None, |custom| {
            assert!(custom.is_empty());
            Ok("export interface A {\n    //[A:]\n    greet() {}\n\n    //[end]\n}\n".to_string())
        })
        .unwrap();
        assert!(!dir.path().join("backups").exists());

        write_file(&path, &options, None, |custom| {
            assert_eq!(custom["A"], "    greet() {}");
            Ok(String::new())
        })
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, header_comment(None));
        let backups: Vec<_> = fs::read_dir(dir.path().join("backups")).unwrap().collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_failed_conversion_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.ts");
        fs::write(&path, "old").unwrap();

        let result = write_file(&path, &ConversionOptions::default(), None, |_| {
            Err(crate::Error::InvalidRootType {
                handle: "u32".to_string(),
                reason: "not a record".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
