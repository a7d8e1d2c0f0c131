//! recordledger - a versioned, content-addressed record store
//!
//! Records are stored under caller-supplied or content-derived keys over a
//! versioned key-value backend, queried by attribute or selector, and every
//! key keeps its full version history.

pub mod api;
pub mod backend;
pub mod cli;
pub mod keys;
pub mod ledger;
pub mod observability;
pub mod record;
