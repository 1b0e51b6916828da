//! Pending changes of the local clone, via read-only git queries.
//!
//! Two queries run in the clone directory, each bounded by [`GIT_TIMEOUT`]:
//!
//! 1. `git diff --stat`: working tree against the index
//! 2. `git ls-files --others --exclude-standard`: untracked, not ignored
//!
//! Nothing here ever fails outward: a missing clone or a broken query is a
//! [`PendingChanges`] variant with a readable rendering.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

use crate::process::{run_bounded, ExitKind};

pub const GIT_TIMEOUT: Duration = Duration::from_secs(10);

const DIFF_STAT: &[&str] = &["diff", "--stat"];
const UNTRACKED: &[&str] = &["ls-files", "--others", "--exclude-standard"];

/// Snapshot computed fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChanges {
    /// The clone directory does not exist yet.
    NotCloned,
    UpToDate,
    Pending {
        /// Trimmed `git diff --stat`; `None` when there is no diff.
        diff_stat: Option<String>,
        untracked: Vec<String>,
    },
    /// A query could not run or exited non-zero.
    Failed(String),
}

impl PendingChanges {
    fn from_queries(diff_stat: String, untracked: String) -> Self {
        let diff_stat = Some(diff_stat).filter(|s| !s.is_empty());
        let untracked: Vec<String> = untracked
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if diff_stat.is_none() && untracked.is_empty() {
            PendingChanges::UpToDate
        } else {
            PendingChanges::Pending {
                diff_stat,
                untracked,
            }
        }
    }

    /// One for a non-empty diff plus one per untracked file.
    pub fn count(&self) -> usize {
        match self {
            PendingChanges::Pending {
                diff_stat,
                untracked,
            } => usize::from(diff_stat.is_some()) + untracked.len(),
            _ => 0,
        }
    }
}

impl fmt::Display for PendingChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingChanges::NotCloned => f.write_str("Unable to check (repo not cloned)"),
            PendingChanges::UpToDate => f.write_str("None (up to date)"),
            PendingChanges::Failed(reason) => write!(f, "Error checking git status: {reason}"),
            PendingChanges::Pending {
                diff_stat,
                untracked,
            } => {
                let mut parts = Vec::with_capacity(2);
                if let Some(stat) = diff_stat {
                    parts.push(format!("modified files: {stat}"));
                }
                if !untracked.is_empty() {
                    parts.push(format!(
                        "untracked files: {} ({})",
                        untracked.len(),
                        untracked.join(", ")
                    ));
                }
                f.write_str(&parts.join("\n"))
            }
        }
    }
}

/// Runs the git queries. Holds only the per-query timeout.
#[derive(Debug, Clone)]
pub struct RepoInspector {
    timeout: Duration,
}

impl Default for RepoInspector {
    fn default() -> Self {
        Self {
            timeout: GIT_TIMEOUT,
        }
    }
}

impl RepoInspector {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn pending_changes(&self, clone_dir: &Path) -> PendingChanges {
        if !clone_dir.exists() {
            return PendingChanges::NotCloned;
        }

        let diff_stat = match self.git(clone_dir, DIFF_STAT).await {
            Ok(out) => out,
            Err(reason) => return PendingChanges::Failed(reason),
        };
        let untracked = match self.git(clone_dir, UNTRACKED).await {
            Ok(out) => out,
            Err(reason) => return PendingChanges::Failed(reason),
        };

        let changes = PendingChanges::from_queries(diff_stat, untracked);
        tracing::debug!(dir = %clone_dir.display(), pending = changes.count(), "inspected clone");
        changes
    }

    /// Trimmed stdout on success, a readable reason otherwise.
    async fn git(&self, dir: &Path, args: &[&str]) -> Result<String, String> {
        let label = format!("git {}", args.join(" "));
        let mut command = Command::new("git");
        command.args(args).current_dir(dir);

        let captured = run_bounded(command, &label, self.timeout)
            .await
            .map_err(|err| err.to_string())?;

        match captured.exit {
            ExitKind::Exited(0) => Ok(captured.stdout.trim().to_string()),
            ExitKind::Exited(code) => Err(format!(
                "`{label}` exited with status {code}: {}",
                first_line(&captured.stderr)
            )),
            ExitKind::Signalled => Err(format!("`{label}` was terminated by a signal")),
            ExitKind::TimedOut(after) => Err(format!(
                "`{label}` timed out after {}s",
                after.as_secs()
            )),
        }
    }
}

/// Git follows its error line with usage text; only the first line is kept.
fn first_line(stderr: &str) -> &str {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queries_are_up_to_date() {
        assert_eq!(
            PendingChanges::from_queries(String::new(), String::new()),
            PendingChanges::UpToDate
        );
    }

    #[test]
    fn untracked_only_omits_modified_segment() {
        let changes = PendingChanges::from_queries(String::new(), "a.json\nb.md".to_string());
        assert_eq!(changes.count(), 2);
        assert_eq!(changes.to_string(), "untracked files: 2 (a.json, b.md)");
    }

    #[test]
    fn diff_counts_once_regardless_of_files() {
        let stat = " a.json | 2 +-\n b.json | 1 +\n 2 files changed".to_string();
        let changes = PendingChanges::from_queries(stat.clone(), "c.txt".to_string());
        assert_eq!(changes.count(), 2);
        assert_eq!(
            changes.to_string(),
            format!("modified files: {stat}\nuntracked files: 1 (c.txt)")
        );
    }

    #[test]
    fn failure_reason_keeps_first_stderr_line() {
        let stderr = "\nwarning: Not a git repository. Use --no-index\nusage: git diff --no-index [<options>] <path> <path>\n\n    --stat\n";
        assert_eq!(
            first_line(stderr),
            "warning: Not a git repository. Use --no-index"
        );
        assert_eq!(first_line("  \n"), "");
    }

    #[test]
    fn sentinel_renderings() {
        assert_eq!(
            PendingChanges::NotCloned.to_string(),
            "Unable to check (repo not cloned)"
        );
        assert_eq!(PendingChanges::UpToDate.to_string(), "None (up to date)");
        assert_eq!(
            PendingChanges::Failed("boom".into()).to_string(),
            "Error checking git status: boom"
        );
    }

    #[tokio::test]
    async fn missing_clone_dir_is_not_cloned() {
        let dir = tempfile::TempDir::new().unwrap();
        let changes = RepoInspector::default()
            .pending_changes(&dir.path().join("repo"))
            .await;
        assert_eq!(changes, PendingChanges::NotCloned);
    }
}
