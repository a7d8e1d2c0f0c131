//! Observable events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` field of a log line.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Backend opened, ready to serve
    BootComplete,
    /// Configuration loaded
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,
    /// Journal replay complete
    JournalReplayed,
    /// Journal could not be opened or replayed (FATAL)
    JournalCorruption,
    /// Serving loop entered
    Serving,
    /// Serving loop ended
    ShutdownComplete,

    // Writes
    /// Record created
    RecordCreated,
    /// Record create refused, key already taken
    RecordDuplicate,
    /// Record updated
    RecordUpdated,
    /// Record deleted
    RecordDeleted,
    /// Delete refused, stored bytes undecodable
    RecordCorrupt,

    // Reads
    /// Range scan, attribute query or selector query completed
    QueryExecuted,
    /// History reconstructed
    HistoryRead,

    // Commands
    /// Command rejected before or during execution
    CommandRejected,
    /// Command failed for a reason outside the caller's control
    CommandFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "RECORDLEDGER_STARTUP_BEGIN",
            Event::BootComplete => "RECORDLEDGER_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::JournalReplayed => "JOURNAL_REPLAYED",
            Event::JournalCorruption => "JOURNAL_CORRUPTION",
            Event::Serving => "RECORDLEDGER_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordDuplicate => "RECORD_DUPLICATE",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::RecordCorrupt => "RECORD_CORRUPT",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::HistoryRead => "HISTORY_READ",

            Event::CommandRejected => "COMMAND_REJECTED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::JournalCorruption)
    }

    /// Returns true if this event reports a backend or data failure
    pub fn is_error(&self) -> bool {
        matches!(self, Event::CommandFailed)
    }

    /// Returns true if this event reports a refused operation
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::RecordDuplicate | Event::RecordCorrupt | Event::CommandRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
