//! Persistence of the configuration record.
//!
//! # Write flow
//!
//! serialize (2-space JSON) → `config.json.tmp` sibling → `chmod 0600` → `rename`.
//! The `.tmp` lives next to the target so the rename never crosses filesystems,
//! and a concurrent reader sees either the old or the new record.
//!
//! Reads are permissive: a missing, unreadable, or malformed file means
//! "unconfigured" and yields `None`.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ConfigError};
use crate::types::{ConfigureRequest, SyncConfig};

/// Reads and writes `config.json`. No caching: every call hits the filesystem.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current record, or `None` when the system is unconfigured.
    pub fn read(&self) -> Option<SyncConfig> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "config not readable");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "config not parseable");
                None
            }
        }
    }

    /// Replace the record wholesale, applying defaults for branch and host.
    pub fn write(&self, request: ConfigureRequest) -> Result<SyncConfig, ConfigError> {
        let repo = request
            .repo
            .filter(|r| !r.is_empty())
            .ok_or(ConfigError::MissingRepo)?;
        let config = SyncConfig::new(repo, request.branch, request.gh_host);

        if let Some(dir) = self.path.parent() {
            ensure_dir(dir)?;
        }
        let json = serde_json::to_string_pretty(&config)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(err) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, err));
        }

        tracing::info!(path = %self.path.display(), config = %config, "configuration saved");
        Ok(config)
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("config.json");
        self.path.with_file_name(format!("{name}.tmp"))
    }
}

fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    set_dir_permissions(dir)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}
