//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Marketplace authentication service
#[derive(Parser, Debug)]
#[command(name = "auth-service")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },

    /// Purge stale sessions once and exit
    Sweep {
        #[command(subcommand)]
        action: SweepAction,
    },
}

/// Arguments for the serve command; unset values come from the environment
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Delete sessions past their expiry
    Expired,
    /// Delete sessions unused for the session lifetime, or for `--days`
    Inactive {
        /// Idle window in days (at least 7)
        #[arg(long)]
        days: Option<i64>,
    },
}
