//! `backup-sync tools`: the tool-call surface served by `serve`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use backup_sync_server::tool_definitions;

/// Arguments for `backup-sync tools`.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Emit the definitions, including input schemas, as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ToolsArgs {
    pub fn run(self) -> Result<()> {
        let tools = tool_definitions();
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&tools).context("failed to serialize tool definitions")?
            );
            return Ok(());
        }

        for tool in tools {
            println!("{}  {}", tool.name.bold(), tool.description.dimmed());
        }
        Ok(())
    }
}
