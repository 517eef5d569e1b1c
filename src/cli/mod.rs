//! CLI module - Command-line interface for issue-roulette
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// issue-roulette - a random open issue, served and cached
#[derive(Parser)]
#[command(name = "issue-roulette")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server and the refresh scheduler (default)
    #[command(alias = "daemon")]
    Serve,

    /// Pick a random issue and store it as the current issue
    Refresh,

    /// Pick a random issue without touching the cache
    Pick,

    /// Show the cached current issue
    Current {
        /// Print the stored JSON as-is
        #[arg(long)]
        raw: bool,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
