//! MoneyMap CLI - personal finance backend
//!
//! Usage:
//!   moneymap serve --port 8000          Start the web server
//!   moneymap parse --file statement.csv Parse a CSV statement offline
//!   moneymap missions --target 15000 --date 2027-09-01
//!                                       Preview a goal's fallback roadmap

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve { port, host } => commands::cmd_serve(&host, port).await,
        Commands::Parse { file, user } => commands::cmd_parse(&file, &user).await,
        Commands::Missions {
            title,
            target,
            date,
        } => commands::cmd_missions(&title, target, &date),
    }
}
