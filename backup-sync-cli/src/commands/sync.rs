//! `backup-sync sync`: run the external sync script once.

use anyhow::Result;

use backup_sync_core::Layout;
use backup_sync_server::Coordinator;

use super::{block_on, emit};

pub fn run(layout: Layout) -> Result<()> {
    let coordinator = Coordinator::new(layout);
    emit(block_on(coordinator.sync())?)
}
