//! Command layer for recordledger
//!
//! Turns caller requests into typed commands and executes them one at a
//! time against the record store.
//!
//! # Design Principles
//!
//! - Closed `Command` type, one handler per variant
//! - Argument counts checked before any backend call
//! - Single mutex around the store
//! - Error codes passed through unchanged
//!
//! # Supported Operations
//!
//! - createRecord
//! - getAllRecords
//! - getRecordByKey
//! - queryRecordsByName / queryRecordsByPhone / queryRecordsById
//! - queryRecordsByAttribute
//! - queryRecordsBySelector
//! - getRecordHistory
//! - updateRecord
//! - deleteRecord

mod command;
mod handler;
mod request;
mod response;

pub use command::{Command, Operation};
pub use handler::CommandHandler;
pub use request::Request;
pub use response::{ErrorResponse, Response, SuccessResponse};
