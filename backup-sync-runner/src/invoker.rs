//! One invocation of the external sync script.
//!
//! The script does the clone/commit/push work and appends to the log
//! itself. Its output is relayed verbatim and never parsed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::error::RunnerError;
use crate::process::{run_bounded, ExitKind};

/// Hard wall-clock limit for one sync run.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs `bash <script>` with the inherited environment. No retries.
#[derive(Debug, Clone)]
pub struct SyncInvoker {
    script: PathBuf,
    timeout: Duration,
}

/// How a script run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Succeeded,
    /// Non-zero exit; `code` is `None` when killed by a signal.
    Failed { code: Option<i32> },
    TimedOut { after: Duration },
}

impl fmt::Display for ScriptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptOutcome::Succeeded => f.write_str("exited successfully"),
            ScriptOutcome::Failed { code: Some(code) } => write!(f, "exited with status {code}"),
            ScriptOutcome::Failed { code: None } => f.write_str("terminated by signal"),
            ScriptOutcome::TimedOut { after } => write!(f, "timed out after {}s", after.as_secs()),
        }
    }
}

/// Combined output plus outcome. `output` may be partial on timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub output: String,
    pub outcome: ScriptOutcome,
}

impl ScriptRun {
    pub fn succeeded(&self) -> bool {
        self.outcome == ScriptOutcome::Succeeded
    }
}

impl SyncInvoker {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            timeout: SYNC_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub async fn run(&self) -> Result<ScriptRun, RunnerError> {
        let mut command = Command::new("bash");
        command.arg(&self.script);

        let started = Instant::now();
        tracing::info!(script = %self.script.display(), "running sync script");
        let captured = run_bounded(command, "bash", self.timeout).await?;

        let outcome = match captured.exit {
            ExitKind::Exited(0) => ScriptOutcome::Succeeded,
            ExitKind::Exited(code) => ScriptOutcome::Failed { code: Some(code) },
            ExitKind::Signalled => ScriptOutcome::Failed { code: None },
            ExitKind::TimedOut(after) => ScriptOutcome::TimedOut { after },
        };
        tracing::info!(
            script = %self.script.display(),
            outcome = %outcome,
            duration_ms = started.elapsed().as_millis() as u64,
            "sync script finished"
        );

        Ok(ScriptRun {
            output: captured.combined(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("backup-sync.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn success_relays_output_verbatim() {
        let dir = TempDir::new().unwrap();
        let run = SyncInvoker::new(script(&dir, "echo 'pushed 3 files'\n"))
            .run()
            .await
            .unwrap();
        assert!(run.succeeded());
        assert_eq!(run.output, "pushed 3 files\n");
    }

    #[tokio::test]
    async fn failure_keeps_stdout_and_stderr() {
        let dir = TempDir::new().unwrap();
        let run = SyncInvoker::new(script(&dir, "echo staging\necho 'push rejected' >&2\nexit 1\n"))
            .run()
            .await
            .unwrap();
        assert_eq!(run.outcome, ScriptOutcome::Failed { code: Some(1) });
        assert_eq!(run.output, "staging\npush rejected\n");
    }

    #[tokio::test]
    async fn timeout_is_a_failure_with_partial_output() {
        let dir = TempDir::new().unwrap();
        let run = SyncInvoker::new(script(&dir, "echo cloning\nsleep 30\n"))
            .with_timeout(Duration::from_millis(500))
            .run()
            .await
            .unwrap();
        assert!(!run.succeeded());
        assert!(matches!(run.outcome, ScriptOutcome::TimedOut { .. }));
        assert!(run.output.contains("cloning"));
    }

    #[tokio::test]
    async fn missing_script_fails_through_bash() {
        let dir = TempDir::new().unwrap();
        let run = SyncInvoker::new(dir.path().join("nope.sh")).run().await.unwrap();
        assert!(matches!(run.outcome, ScriptOutcome::Failed { code: Some(_) }));
        assert!(!run.output.is_empty());
    }

    #[test]
    fn keeps_script_path_and_default_timeout() {
        let invoker = SyncInvoker::new("/plugin/scripts/backup-sync.sh");
        assert_eq!(invoker.script(), Path::new("/plugin/scripts/backup-sync.sh"));
        assert_eq!(invoker.timeout, SYNC_TIMEOUT);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(ScriptOutcome::Failed { code: Some(2) }.to_string(), "exited with status 2");
        assert_eq!(
            ScriptOutcome::TimedOut { after: SYNC_TIMEOUT }.to_string(),
            "timed out after 60s"
        );
    }
}
