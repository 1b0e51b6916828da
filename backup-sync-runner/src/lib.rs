//! # backup-sync-runner
//!
//! Everything that leaves the process or reads external state:
//!
//! - [`process`]: bounded-time subprocess with incremental output capture
//! - [`invoker`]: [`SyncInvoker`], one run of the external sync script
//! - [`inspect`]: [`RepoInspector`], pending changes of the local clone
//! - [`log_tail`]: last N non-empty lines of the sync log

pub mod error;
pub mod inspect;
pub mod invoker;
pub mod log_tail;
pub mod process;

pub use error::RunnerError;
pub use inspect::{PendingChanges, RepoInspector, GIT_TIMEOUT};
pub use invoker::{ScriptOutcome, ScriptRun, SyncInvoker, SYNC_TIMEOUT};
pub use log_tail::{read_tail, Tail, DEFAULT_TAIL_LINES};
pub use process::{run_bounded, Captured, ExitKind};
