//! On-disk layout.
//!
//! ```text
//! <home>/.claude/backup-sync/
//!   config.json   (written by configure: mode 0600)
//!   sync.log      (appended by the sync script, read-only here)
//!   repo/         (local clone, managed by the sync script)
//!
//! <plugin_root>/scripts/backup-sync.sh
//! ```
//!
//! Tests build a [`Layout`] with [`Layout::at`]; binaries use [`Layout::discover`].

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const PLUGIN_ROOT_ENV: &str = "CLAUDE_PLUGIN_ROOT";

pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "sync.log";
pub const CLONE_DIR: &str = "repo";
pub const SYNC_SCRIPT: &str = "backup-sync.sh";

pub fn config_dir(home: &Path) -> PathBuf {
    home.join(".claude").join("backup-sync")
}

pub fn config_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE)
}

pub fn log_path(home: &Path) -> PathBuf {
    config_dir(home).join(LOG_FILE)
}

pub fn clone_dir(home: &Path) -> PathBuf {
    config_dir(home).join(CLONE_DIR)
}

pub fn script_path(plugin_root: &Path) -> PathBuf {
    plugin_root.join("scripts").join(SYNC_SCRIPT)
}

/// Resolved locations of every file the coordinator touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub log_path: PathBuf,
    pub clone_dir: PathBuf,
    pub script_path: PathBuf,
}

impl Layout {
    /// Explicit home and plugin root; no environment lookups.
    pub fn at(home: &Path, plugin_root: &Path) -> Self {
        Self {
            config_dir: config_dir(home),
            config_path: config_path(home),
            log_path: log_path(home),
            clone_dir: clone_dir(home),
            script_path: script_path(plugin_root),
        }
    }

    /// Resolve from the environment, letting explicit overrides win.
    pub fn discover(
        home: Option<PathBuf>,
        plugin_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let home = match home {
            Some(home) => home,
            None => dirs::home_dir().ok_or(ConfigError::HomeNotFound)?,
        };
        let plugin_root = plugin_root.unwrap_or_else(default_plugin_root);
        Ok(Self::at(&home, &plugin_root))
    }
}

/// `$CLAUDE_PLUGIN_ROOT` when set, otherwise the parent of the directory
/// holding the running executable (`<root>/bin/backup-sync` → `<root>`).
pub fn default_plugin_root() -> PathBuf {
    if let Some(root) = std::env::var_os(PLUGIN_ROOT_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(root);
    }
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
