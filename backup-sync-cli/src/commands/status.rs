//! `backup-sync status`: configuration, last sync and pending changes.

use anyhow::Result;

use backup_sync_core::Layout;
use backup_sync_server::Coordinator;

use super::{block_on, emit};

pub fn run(layout: Layout) -> Result<()> {
    let coordinator = Coordinator::new(layout);
    emit(block_on(coordinator.status())?)
}
