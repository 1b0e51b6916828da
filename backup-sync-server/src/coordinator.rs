//! Dispatches the four tool calls onto the store, invoker, inspector and
//! log reader, and formats their results.
//!
//! Every path ends in a [`ToolResult`]; failures become flagged text.

use std::time::Instant;

use serde_json::Value;

use backup_sync_core::{ConfigStore, ConfigureRequest, Layout, SyncConfig};
use backup_sync_runner::{
    read_tail, PendingChanges, RepoInspector, ScriptRun, SyncInvoker, Tail, DEFAULT_TAIL_LINES,
};

use crate::protocol::ToolResult;
use crate::tools::{LogRequest, Tool};

pub const NOT_CONFIGURED: &str = "Not configured. Please run backup_configure first.";
pub const NEVER_SYNCED: &str = "Never";
pub const NO_HISTORY: &str = "No sync history";
pub const EMPTY_LOG: &str = "Log file is empty";

pub struct Coordinator {
    layout: Layout,
    store: ConfigStore,
    invoker: SyncInvoker,
    inspector: RepoInspector,
}

impl Coordinator {
    pub fn new(layout: Layout) -> Self {
        Self {
            store: ConfigStore::new(layout.config_path.clone()),
            invoker: SyncInvoker::new(layout.script_path.clone()),
            inspector: RepoInspector::default(),
            layout,
        }
    }

    pub fn with_invoker(mut self, invoker: SyncInvoker) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn with_inspector(mut self, inspector: RepoInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Dispatch a tool call by wire name. `arguments` may be `null`.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResult {
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        let started = Instant::now();

        let Some(tool) = Tool::from_name(name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return ToolResult::error(format!("Unknown tool: {name}"));
        };

        let result = match tool {
            Tool::Configure => match serde_json::from_value(arguments) {
                Ok(request) => self.configure(request),
                Err(err) => ToolResult::error(format!(
                    "Error configuring backup-sync: invalid arguments: {err}"
                )),
            },
            Tool::Sync => self.sync().await,
            Tool::Status => self.status().await,
            Tool::Log => match serde_json::from_value::<LogRequest>(arguments) {
                Ok(request) => self.log(request.line_count(DEFAULT_TAIL_LINES)),
                Err(err) => {
                    ToolResult::error(format!("Error reading log: invalid arguments: {err}"))
                }
            },
        };

        tracing::info!(
            tool = %tool,
            is_error = result.is_error,
            duration_ms = started.elapsed().as_millis() as u64,
            "tool call handled"
        );
        result
    }

    pub fn configure(&self, request: ConfigureRequest) -> ToolResult {
        match self.store.write(request) {
            Ok(config) => ToolResult::text(format!(
                "Backup-sync configured successfully.\n\nRepo: {}\nBranch: {}\nHost: {}\nConfig saved to: {}",
                config.repo,
                config.branch,
                config.host,
                self.store.path().display()
            )),
            Err(err) => {
                tracing::warn!(error = %err, "configure failed");
                ToolResult::error(format!("Error configuring backup-sync: {err}"))
            }
        }
    }

    pub async fn sync(&self) -> ToolResult {
        let Some(config) = self.store.read() else {
            return ToolResult::error(NOT_CONFIGURED);
        };
        tracing::info!(
            config = %config,
            script = %self.invoker.script().display(),
            "sync requested"
        );

        match self.invoker.run().await {
            Ok(run) if run.succeeded() => ToolResult::text(format!("Sync completed:\n{}", run.output)),
            Ok(run) => {
                tracing::warn!(outcome = %run.outcome, "sync script failed");
                ToolResult::error(format!("Sync script exited with error:\n{}", failure_body(&run)))
            }
            Err(err) => {
                tracing::error!(error = %err, "sync script could not be started");
                ToolResult::error(format!("Error running sync: {err}"))
            }
        }
    }

    pub async fn status(&self) -> ToolResult {
        let Some(config) = self.store.read() else {
            return ToolResult::text(NOT_CONFIGURED);
        };
        let last_sync = self.last_sync();
        let pending = self.inspector.pending_changes(&self.layout.clone_dir).await;
        ToolResult::text(format_status(&config, &last_sync, &pending))
    }

    pub fn log(&self, lines: usize) -> ToolResult {
        match read_tail(&self.layout.log_path, lines) {
            Ok(Tail::Missing) => ToolResult::text(NO_HISTORY),
            Ok(Tail::Empty) => ToolResult::text(EMPTY_LOG),
            Ok(Tail::Lines(text)) => ToolResult::text(text),
            Err(err) => ToolResult::error(format!("Error reading log: {err}")),
        }
    }

    /// Last log line; any failure reads as "Never".
    fn last_sync(&self) -> String {
        match read_tail(&self.layout.log_path, 1) {
            Ok(tail) => tail.into_lines().unwrap_or_else(|| NEVER_SYNCED.to_string()),
            Err(err) => {
                tracing::debug!(error = %err, "last sync unreadable");
                NEVER_SYNCED.to_string()
            }
        }
    }
}

/// Non-zero exit and timeout share one message; the reason only appears
/// when there is no output to show.
fn failure_body(run: &ScriptRun) -> String {
    if run.output.trim().is_empty() {
        format!("(no output; script {})", run.outcome)
    } else {
        run.output.clone()
    }
}

fn format_status(config: &SyncConfig, last_sync: &str, pending: &PendingChanges) -> String {
    [
        format!("Repo:          {}", config.repo),
        format!("Branch:        {}", config.branch),
        format!("Host:          {}", config.host),
        format!("Last sync:     {last_sync}"),
        format!("Pending changes:\n{pending}"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_sync_runner::ScriptOutcome;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn default_invoker_runs_plugin_script() {
        let layout = Layout::at(Path::new("/home/me"), Path::new("/plugin"));
        let coordinator = Coordinator::new(layout.clone());
        assert_eq!(coordinator.invoker.script(), layout.script_path.as_path());
    }

    #[test]
    fn status_report_layout() {
        let config = SyncConfig::new("me/dotfiles", None, None);
        let text = format_status(&config, "2024-05-01 ok", &PendingChanges::UpToDate);
        assert_eq!(
            text,
            "Repo:          me/dotfiles\n\
             Branch:        main\n\
             Host:          github.com\n\
             Last sync:     2024-05-01 ok\n\
             Pending changes:\n\
             None (up to date)"
        );
    }

    #[test]
    fn failure_body_never_empty() {
        let run = ScriptRun {
            output: String::new(),
            outcome: ScriptOutcome::TimedOut {
                after: Duration::from_secs(60),
            },
        };
        assert_eq!(failure_body(&run), "(no output; script timed out after 60s)");

        let run = ScriptRun {
            output: "fatal: auth\n".into(),
            outcome: ScriptOutcome::Failed { code: Some(128) },
        };
        assert_eq!(failure_body(&run), "fatal: auth\n");
    }
}
