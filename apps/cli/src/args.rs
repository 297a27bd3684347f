use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flags override the config file for this run only.
#[derive(Debug, Parser)]
#[command(name = "phone-usage")]
#[command(about = "Billing-cycle and daily usage service for phone numbers")]
pub struct Cli {
    #[arg(short, long, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PORT", help = "Port to listen on")]
    pub port: Option<u16>,

    #[arg(long, env = "BIND_ADDRESS", help = "Address to bind")]
    pub bind_address: Option<String>,

    #[arg(long, env = "DATABASE_PATH", help = "SQLite database file")]
    pub database_path: Option<String>,

    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        help = "Per-request deadline in milliseconds, 0 disables it"
    )]
    pub request_timeout_ms: Option<u64>,

    #[arg(long, env = "LOG_LEVEL", help = "Log filter when RUST_LOG is unset")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply migrations and serve the HTTP API (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}
