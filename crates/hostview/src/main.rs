//! hostview - plan which host paths a sandbox can see
//!
//! Main entry point for the hostview CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{HostFsArg, plan, table, visible};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// hostview - plan which host paths a sandbox can see
#[derive(Parser)]
#[command(name = "hostview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Exposure request file (default: $HOSTVIEW_CONFIG, then discovered)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bind a host path read-only
    #[arg(long = "ro", value_name = "PATH", global = true)]
    pub read_only: Vec<PathBuf>,

    /// Bind a host path read-write
    #[arg(long = "rw", value_name = "PATH", global = true)]
    pub read_write: Vec<PathBuf>,

    /// Hide a host path behind a tmpfs
    #[arg(long, value_name = "PATH", global = true)]
    pub tmpfs: Vec<PathBuf>,

    /// Ensure a directory exists in the sandbox
    #[arg(long, value_name = "PATH", global = true)]
    pub dir: Vec<PathBuf>,

    /// Expose the host's /usr and /etc under /run/host
    #[arg(long, value_enum, global = true)]
    pub host_fs: Option<HostFsArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the mount plan as bubblewrap arguments
    Plan(plan::PlanArgs),

    /// Check whether host paths are visible inside the sandbox
    Visible(visible::VisibleArgs),

    /// Print the export table
    Table(table::TableArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so plans on stdout stay machine-readable.
    let filter = if cli.verbose {
        "hostview=debug,hostview_config=debug,hostview_exports=debug,warn"
    } else {
        "hostview=info,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config: cli.config,
        read_only: cli.read_only,
        read_write: cli.read_write,
        tmpfs: cli.tmpfs,
        dir: cli.dir,
        host_fs: cli.host_fs.map(Into::into),
    };

    match cli.command {
        Commands::Plan(args) => plan::run(args, &ctx),
        Commands::Visible(args) => visible::run(args, &ctx),
        Commands::Table(args) => table::run(args, &ctx),
    }
}
