//! Error types for backup-sync-runner.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a run or read from producing any result at all.
///
/// A subprocess that starts and then fails or times out is *not* an error
/// here; it is reported through [`crate::ExitKind`].
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The program could not be started (missing binary, permissions).
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a started child failed.
    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`RunnerError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RunnerError {
    RunnerError::Io {
        path: path.into(),
        source,
    }
}
