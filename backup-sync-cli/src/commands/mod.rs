//! One module per subcommand, plus the shared runtime and output helpers.

pub mod configure;
pub mod log;
pub mod serve;
pub mod status;
pub mod sync;
pub mod tools;

use std::future::Future;

use anyhow::{bail, Context, Result};
use backup_sync_server::ToolResult;

/// Drive `future` to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Print a successful result on stdout; turn a flagged one into an error.
pub(crate) fn emit(result: ToolResult) -> Result<()> {
    let text = result.text_content();
    if result.is_error {
        bail!(text);
    }
    println!("{text}");
    Ok(())
}
