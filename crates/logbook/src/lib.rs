//! `logbook` - A personal log of radio contacts
//!
//! This library provides the entry model, its byte encoding, and a small
//! bucketed key/value store on an embedded database file that the `logbook`
//! binary reads and writes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

// The store holds an advisory lock on the same file SQLite reads and writes,
// which only works where file locks are advisory.
#[cfg(not(unix))]
compile_error!("logbook supports Linux and macOS only");

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod storage;

pub use config::Config;
pub use entry::{Entry, EntryCodec, JsonCodec};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{Pair, Store, StoreOptions};
