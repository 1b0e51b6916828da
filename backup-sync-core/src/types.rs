//! The persisted configuration record.
//!
//! On disk the host lives under the `gh_host` key; in Rust it is `host`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_HOST: &str = "github.com";

/// Remote repository the external script pushes to.
///
/// Field order is the on-disk key order: `repo`, `branch`, `gh_host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// `owner/name`. Not validated here; a malformed value fails inside the script.
    pub repo: String,
    #[serde(default = "default_branch", deserialize_with = "branch_or_default")]
    pub branch: String,
    #[serde(
        rename = "gh_host",
        default = "default_host",
        deserialize_with = "host_or_default"
    )]
    pub host: String,
}

impl SyncConfig {
    /// Build a complete record, substituting defaults for absent or empty values.
    pub fn new(repo: impl Into<String>, branch: Option<String>, host: Option<String>) -> Self {
        Self {
            repo: repo.into(),
            branch: non_empty(branch).unwrap_or_else(default_branch),
            host: non_empty(host).unwrap_or_else(default_host),
        }
    }
}

impl fmt::Display for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.repo, self.branch, self.host)
    }
}

/// Arguments of the configure operation.
///
/// `repo` is optional at this layer so that a missing value can be reported
/// as [`crate::ConfigError::MissingRepo`] instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub gh_host: Option<String>,
}

impl ConfigureRequest {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: Some(repo.into()),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn gh_host(mut self, host: impl Into<String>) -> Self {
        self.gh_host = Some(host.into());
        self
    }
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Hand-edited records may carry `null` or `""`; both read as the default.
fn branch_or_default<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(non_empty(Option::deserialize(de)?).unwrap_or_else(default_branch))
}

fn host_or_default<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(non_empty(Option::deserialize(de)?).unwrap_or_else(default_host))
}
