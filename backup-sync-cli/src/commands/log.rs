//! `backup-sync log`: tail of the sync log.

use anyhow::Result;
use clap::Args;

use backup_sync_core::Layout;
use backup_sync_runner::DEFAULT_TAIL_LINES;
use backup_sync_server::Coordinator;

use super::emit;

/// Arguments for `backup-sync log`.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Number of trailing non-empty lines to show.
    #[arg(long, default_value_t = DEFAULT_TAIL_LINES)]
    pub lines: usize,
}

impl LogArgs {
    pub fn run(self, layout: Layout) -> Result<()> {
        emit(Coordinator::new(layout).log(self.lines))
    }
}
