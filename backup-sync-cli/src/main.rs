//! backup-sync: configure, trigger and inspect the config backup sync.
//!
//! # Usage
//!
//! ```text
//! backup-sync configure <owner/repo> [--branch main] [--gh-host github.com]
//! backup-sync sync
//! backup-sync status
//! backup-sync log [--lines 20]
//! backup-sync tools [--json]
//! backup-sync serve
//! ```
//!
//! Global `--home` and `--plugin-root` override where state and the sync
//! script are looked up.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use backup_sync_core::Layout;
use commands::{configure::ConfigureArgs, log::LogArgs, tools::ToolsArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "backup-sync",
    version,
    about = "Back up a local configuration directory to a remote git repository",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    locations: LocationArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Save the remote repository, branch and host.
    Configure(ConfigureArgs),

    /// Run the sync script once.
    Sync,

    /// Show configuration, last sync and pending changes.
    Status,

    /// Print the tail of the sync log.
    Log(LogArgs),

    /// List the tool-call surface.
    Tools(ToolsArgs),

    /// Serve tool calls as JSON-RPC over stdin/stdout.
    Serve,
}

/// Where state lives; both default to the environment.
#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Home directory holding `.claude/backup-sync/` (default: $HOME).
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Directory containing `scripts/backup-sync.sh` (default: $CLAUDE_PLUGIN_ROOT).
    #[arg(long, global = true, value_name = "DIR")]
    pub plugin_root: Option<PathBuf>,
}

impl LocationArgs {
    fn layout(self) -> Result<Layout> {
        Layout::discover(self.home, self.plugin_root).context("could not resolve backup-sync paths")
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Commands::Serve => "info",
        _ => "warn",
    };
    backup_sync_server::init_tracing(default_level);

    let layout = cli.locations.layout()?;
    match cli.command {
        Commands::Configure(args) => args.run(layout),
        Commands::Sync => commands::sync::run(layout),
        Commands::Status => commands::status::run(layout),
        Commands::Log(args) => args.run(layout),
        Commands::Tools(args) => args.run(),
        Commands::Serve => commands::serve::run(layout),
    }
}
