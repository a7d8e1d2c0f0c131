//! CLI module for recordledger
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - exec: Run one operation
//! - serve: Handle JSON requests from stdin until EOF

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, serve, serve_loop, Config, Persistence};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
