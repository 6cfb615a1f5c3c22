use std::path::PathBuf;

/// Errors from frontend file generation.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform/collection aggregate file could not be written. Fatal
    /// for the target: the frontend cannot function without it.
    #[error("Failed to write aggregate file {path}: {source}")]
    Aggregate {
        path: PathBuf,
        source: std::io::Error,
    },
}
