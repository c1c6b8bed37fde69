//! Command-line interface for logbook.
//!
//! This module provides the CLI structure, prompt handling and table output
//! for the `logbook` binary.

mod commands;
pub mod input;
pub mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, GetCommand};

/// logbook - Keep a log of your radio contacts
///
/// Records call signs and operator names in a local database and shows them
/// back one at a time or all at once.
#[derive(Debug, Parser)]
#[command(name = "logbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short = 'C', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new logbook entry
    Add(AddCommand),

    /// Get a particular logbook entry
    Get(GetCommand),

    /// List all logbook entries
    List,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
