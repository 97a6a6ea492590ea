use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod auth;
mod cli;
mod command;
mod config;
mod error;
mod mcp;

use auth::SfCliSource;
use cli::{Cli, Commands};
use config::Config;
use mcp::SessionHub;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the MCP protocol. RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(&cli.settings)?;

    if let Some(Commands::Logout) = cli.command {
        return command::run_logout(&config);
    }

    let hub = Arc::new(SessionHub::new(config, Arc::new(SfCliSource::new()))?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => command::run_serve(hub).await,
        Commands::Login => command::run_login(&hub).await,
        Commands::Status => command::run_status(&hub).await,
        Commands::Orgs => command::run_orgs(&hub).await,
        Commands::Logout => command::run_logout(hub.config()),
    }
}
