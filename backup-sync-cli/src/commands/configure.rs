//! `backup-sync configure`: write the configuration record.

use anyhow::Result;
use clap::Args;

use backup_sync_core::{ConfigureRequest, Layout};
use backup_sync_server::Coordinator;

use super::emit;

/// Arguments for `backup-sync configure`.
#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Remote repository in `owner/repo` form.
    pub repo: String,

    /// Branch to push to (default: main).
    #[arg(long)]
    pub branch: Option<String>,

    /// Git host (default: github.com).
    #[arg(long)]
    pub gh_host: Option<String>,
}

impl ConfigureArgs {
    pub fn run(self, layout: Layout) -> Result<()> {
        let request = ConfigureRequest {
            repo: Some(self.repo),
            branch: self.branch,
            gh_host: self.gh_host,
        };
        emit(Coordinator::new(layout).configure(request))
    }
}
