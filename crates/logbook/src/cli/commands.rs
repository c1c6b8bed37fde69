//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Add command arguments.
///
/// Fields left out on the command line are prompted for on stdin.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Call sign of the contacted station
    #[arg(short, long)]
    pub callsign: Option<String>,

    /// Name of the contacted operator
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Get command arguments.
#[derive(Debug, Args)]
pub struct GetCommand {
    /// Call sign to look up
    #[arg(short, long)]
    pub callsign: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
