//! Error types for backup-sync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration and layout operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure with the path that was being touched.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (write path only; reads are permissive).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// `repo` was absent or empty in a configure request.
    #[error("missing required argument `repo`")]
    MissingRepo,

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.claude/backup-sync/`.
    #[error("cannot determine home directory; set $HOME or pass --home")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
