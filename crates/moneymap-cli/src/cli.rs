//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// MoneyMap - personal finance backend
#[derive(Parser)]
#[command(name = "moneymap")]
#[command(about = "Personal finance backend with LLM-assisted planning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Parse a CSV bank statement into a spending report (offline)
    Parse {
        /// CSV file to parse
        #[arg(short, long)]
        file: PathBuf,

        /// User id recorded on the report
        #[arg(long, default_value = "user_local")]
        user: String,
    },

    /// Preview the deterministic mission roadmap for a goal (offline)
    Missions {
        /// Goal title
        #[arg(long, default_value = "Savings Goal")]
        title: String,

        /// Target amount
        #[arg(long)]
        target: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}
