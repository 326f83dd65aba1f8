//! Error types for the processing engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the processing engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A non-empty state file could not be parsed. Scoped to one directory;
    /// never silently discarded, because overwriting it would forget which
    /// files were already processed.
    #[error("corrupt state file {path}: {source}")]
    StateCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Another instance already holds the run lock for this input root.
    #[error("run lock unavailable: {path} already exists")]
    LockUnavailable { path: PathBuf },

    /// The input root does not exist or is not a directory.
    #[error("input root is not a directory: {0}")]
    InvalidRoot(PathBuf),
}
