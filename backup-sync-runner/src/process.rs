//! Bounded-time subprocess execution.
//!
//! stdout and stderr are drained by background tasks into shared buffers
//! while the child runs, so whatever was written before a timeout is still
//! returned. On timeout the child is killed; grandchildren that keep the
//! pipes open are not waited for longer than [`PIPE_GRACE`].

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

/// How long to keep draining pipes after the child is gone.
pub const PIPE_GRACE: Duration = Duration::from_secs(1);

/// How the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Exited(i32),
    /// Terminated by a signal before reporting an exit code.
    Signalled,
    TimedOut(Duration),
}

impl ExitKind {
    pub fn success(self) -> bool {
        self == ExitKind::Exited(0)
    }
}

/// Output captured from one run. May be partial when `exit` is `TimedOut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
    pub exit: ExitKind,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.exit.success()
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

type Sink = Arc<Mutex<Vec<u8>>>;

/// Run `command` with null stdin and the caller's environment, killing it
/// after `timeout`.
///
/// `label` names the command in errors and logs.
pub async fn run_bounded(
    mut command: Command,
    label: &str,
    timeout: Duration,
) -> Result<Captured, RunnerError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
        command: label.to_string(),
        source,
    })?;

    let stdout: Sink = Arc::default();
    let stderr: Sink = Arc::default();
    let readers = [
        child.stdout.take().map(|pipe| spawn_drain(pipe, stdout.clone())),
        child.stderr.take().map(|pipe| spawn_drain(pipe, stderr.clone())),
    ];

    let exit = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => match status.code() {
            Some(code) => ExitKind::Exited(code),
            None => ExitKind::Signalled,
        },
        Ok(Err(source)) => {
            return Err(RunnerError::Wait {
                command: label.to_string(),
                source,
            })
        }
        Err(_) => {
            tracing::warn!(command = label, timeout_ms = timeout.as_millis() as u64, "command timed out; killing");
            if let Err(err) = child.start_kill() {
                tracing::debug!(command = label, error = %err, "kill after timeout failed");
            }
            let _ = child.wait().await;
            ExitKind::TimedOut(timeout)
        }
    };

    for reader in readers.into_iter().flatten() {
        if tokio::time::timeout(PIPE_GRACE, reader).await.is_err() {
            tracing::debug!(command = label, "pipe still open after exit; keeping partial output");
        }
    }

    Ok(Captured {
        stdout: snapshot(&stdout),
        stderr: snapshot(&stderr),
        exit,
    })
}

fn spawn_drain<R>(mut pipe: R, sink: Sink) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => sink
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
            }
        }
    })
}

fn snapshot(sink: &Sink) -> String {
    let bytes = sink.lock().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&bytes).into_owned()
}
