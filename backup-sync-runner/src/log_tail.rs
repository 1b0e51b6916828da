//! Tail of the append-only sync log.
//!
//! The log belongs to the sync script; this module only reads it.

use std::path::Path;

use crate::error::{io_err, RunnerError};

pub const DEFAULT_TAIL_LINES: usize = 20;

/// Result of tailing the log. `Missing` and `Empty` are distinct so callers
/// can tell "never synced" from "log exists but has no content".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tail {
    Missing,
    Empty,
    Lines(String),
}

impl Tail {
    pub fn into_lines(self) -> Option<String> {
        match self {
            Tail::Lines(lines) => Some(lines),
            Tail::Missing | Tail::Empty => None,
        }
    }
}

/// Last `n` non-blank lines of `path`, newline-joined. `n == 0` means
/// [`DEFAULT_TAIL_LINES`].
pub fn read_tail(path: &Path, n: usize) -> Result<Tail, RunnerError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Tail::Missing),
        Err(err) => return Err(io_err(path, err)),
    };
    let n = if n == 0 { DEFAULT_TAIL_LINES } else { n };

    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(Tail::Empty);
    }

    let start = lines.len().saturating_sub(n);
    Ok(Tail::Lines(lines[start..].join("\n")))
}
