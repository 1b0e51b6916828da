//! `backup-sync serve`: JSON-RPC tool calls over stdio until EOF.

use anyhow::{Context, Result};

use backup_sync_core::Layout;
use backup_sync_server::{serve_stdio, Coordinator};

use super::block_on;

pub fn run(layout: Layout) -> Result<()> {
    let coordinator = Coordinator::new(layout);
    block_on(serve_stdio(&coordinator))?.context("stdio server exited with error")
}
