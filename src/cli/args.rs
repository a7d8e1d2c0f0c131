//! CLI argument definitions using clap
//!
//! Commands:
//! - recordledger init --config <path>
//! - recordledger exec --config <path> <operation> [args...]
//! - recordledger serve --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordledger - a versioned, content-addressed record store
#[derive(Parser, Debug)]
#[command(name = "recordledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./recordledger.json")]
        config: PathBuf,
    },

    /// Execute a single operation and exit
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./recordledger.json")]
        config: PathBuf,

        /// Operation name, e.g. createRecord
        op: String,

        /// Positional operation arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Read JSON requests from stdin, one per line, until EOF
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./recordledger.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
