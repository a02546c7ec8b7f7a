use std::path::PathBuf;

/// Errors returned by the generator.
///
/// Field types that cannot be classified are never an error: they fall back
/// to `any` with a warning in the log.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested root does not name a struct with named fields.
    #[error("`{handle}` is not a record type: {reason}")]
    InvalidRootType { handle: String, reason: String },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: syn::Error },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to scan source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
