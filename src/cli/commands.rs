//! CLI command implementations
//!
//! Every command loads and validates the configuration first. `exec` and
//! `serve` open the configured backend before handling any request; with
//! journal persistence that means a full replay, and a corrupt journal
//! stops the process before anything is served.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{CommandHandler, Response};
use crate::backend::{JournalStore, LedgerBackend, MemoryStore, TxIdMode, JOURNAL_DIR};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_response};

/// Where record versions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Process memory only; nothing survives exit
    Memory,
    /// Append-only journal under the data directory
    Journal,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// "memory" or "journal" (optional, default "journal")
    #[serde(default = "default_persistence")]
    pub persistence: String,

    /// "uuid" or "sequential" (optional, default "uuid")
    #[serde(default = "default_tx_id_mode")]
    pub tx_id_mode: String,

    /// Lowest emitted log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_persistence() -> String {
    "journal".to_string()
}
fn default_tx_id_mode() -> String {
    "uuid".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(Event::ConfigLoaded, &[("data_dir", config.data_dir.as_str())]);
        Ok(config)
    }

    /// Validate every field
    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        self.persistence()?;
        self.tx_id_mode()?;
        self.log_level()?;
        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn persistence(&self) -> CliResult<Persistence> {
        match self.persistence.as_str() {
            "memory" => Ok(Persistence::Memory),
            "journal" => Ok(Persistence::Journal),
            other => Err(CliError::config_error(format!(
                "Invalid persistence: '{}'. Must be 'memory' or 'journal'.",
                other
            ))),
        }
    }

    pub fn tx_id_mode(&self) -> CliResult<TxIdMode> {
        match self.tx_id_mode.as_str() {
            "uuid" => Ok(TxIdMode::Uuid),
            "sequential" => Ok(TxIdMode::Sequential),
            other => Err(CliError::config_error(format!(
                "Invalid tx_id_mode: '{}'. Must be 'uuid' or 'sequential'.",
                other
            ))),
        }
    }

    pub fn log_level(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Exec { config, op, args } => exec(&config, &op, &args),
        Command::Serve { config } => serve(&config),
    }
}

/// Initialize a new data directory
///
/// Creates `<data_dir>/journal`. Writes no journal entries.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let dir = data_dir.join(JOURNAL_DIR);
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    log_event_with_fields(Event::DataDirInitialized, &[("data_dir", config.data_dir.as_str())]);
    let mut stdout = io::stdout();
    write_response(&mut stdout, &Response::success(serde_json::json!({"initialized": true})))
}

/// Execute one operation and print its response
pub fn exec(config_path: &Path, op: &str, args: &[String]) -> CliResult<()> {
    let config = load_config(config_path)?;
    let mut stdout = io::stdout();

    match config.persistence()? {
        Persistence::Memory => exec_on(boot_memory(&config)?, op, args, &mut stdout),
        Persistence::Journal => exec_on(boot_journal(&config)?, op, args, &mut stdout),
    }
}

/// Serve JSON requests from stdin until EOF
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    match config.persistence()? {
        Persistence::Memory => serve_on(boot_memory(&config)?),
        Persistence::Journal => serve_on(boot_journal(&config)?),
    }
}

fn serve_on<B: LedgerBackend>(backend: B) -> CliResult<()> {
    let handler = CommandHandler::new(backend);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let handled = serve_loop(&handler, stdin.lock(), &mut stdout)?.to_string();

    let metrics = serde_json::to_string(&handler.metrics().snapshot())
        .unwrap_or_else(|_| "{}".to_string());
    log_event_with_fields(
        Event::ShutdownComplete,
        &[("metrics", metrics.as_str()), ("requests", handled.as_str())],
    );
    Ok(())
}

/// Handle one request per input line, writing one response per line.
///
/// Returns the number of requests handled. A failed read ends the loop
/// after its error is reported.
pub fn serve_loop<B, R, W>(handler: &CommandHandler<B>, input: R, output: &mut W) -> CliResult<u64>
where
    B: LedgerBackend,
    R: BufRead,
    W: Write,
{
    log_event(Event::Serving);
    let mut handled = 0;

    for line in read_requests(input) {
        match line {
            Ok(line) => {
                let response = handler.handle_line(&line);
                write_response(output, &response)?;
                handled += 1;
            }
            Err(e) => {
                write_error(output, &e)?;
                return Err(e);
            }
        }
    }

    Ok(handled)
}

fn exec_on<B: LedgerBackend, W: Write>(
    backend: B,
    op: &str,
    args: &[String],
    output: &mut W,
) -> CliResult<()> {
    let handler = CommandHandler::new(backend);
    let response = handler.handle(op, args);
    write_response(output, &response)
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    log_event(Event::BootStart);
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_level()?);
    Ok(config)
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(JOURNAL_DIR).is_dir()
}

fn boot_memory(config: &Config) -> CliResult<MemoryStore> {
    if !is_initialized(config.data_path()) {
        return Err(CliError::not_initialized());
    }
    let store = MemoryStore::with_tx_mode(config.tx_id_mode()?);
    log_event_with_fields(Event::BootComplete, &[("persistence", "memory")]);
    Ok(store)
}

/// Open the journal and replay it in full
///
/// A corrupt or unreadable journal is fatal: nothing is served.
fn boot_journal(config: &Config) -> CliResult<JournalStore> {
    if !is_initialized(config.data_path()) {
        return Err(CliError::not_initialized());
    }

    let store = JournalStore::open(config.data_path(), config.tx_id_mode()?).map_err(|e| {
        log_event_with_fields(Event::JournalCorruption, &[("error", e.message())]);
        CliError::from(e)
    })?;

    let replayed = store.replayed().to_string();
    let path = store.path().display().to_string();
    log_event_with_fields(
        Event::JournalReplayed,
        &[("entries", replayed.as_str()), ("path", path.as_str())],
    );
    log_event_with_fields(Event::BootComplete, &[("persistence", "journal")]);
    Ok(store)
}
