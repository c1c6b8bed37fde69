//! Logging setup for the `logbook` binary.
//!
//! Diagnostics go through `tracing` to stderr. Stdout carries only what a
//! command produces (prompts, `saved`, and the entry tables), so output can be
//! piped without log lines mixed in.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate target the default filter applies to.
const LOG_TARGET: &str = "logbook";

/// How much the store and commands report on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Warnings, such as a database that failed to close cleanly.
    #[default]
    Normal,
    /// Opens, closes, lookups and stored ids (`-v`).
    Verbose,
    /// Also lock polling (`-vv`).
    Trace,
}

impl Verbosity {
    /// Pick a verbosity from the `-v` count and the `-q` flag. `-q` wins.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The tracing level this verbosity lets through.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set, e.g. `logbook=warn`.
    #[must_use]
    pub fn directive(&self) -> String {
        format!(
            "{LOG_TARGET}={}",
            self.to_level_filter().to_string().to_ascii_lowercase()
        )
    }
}

/// Install the stderr subscriber for the binary.
///
/// Only events from this crate pass the default filter; `RUST_LOG`, when set
/// and valid, replaces it entirely. Calling this twice keeps the first
/// subscriber.
///
/// # Examples
///
/// ```no_run
/// use logbook::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose),
        )
        .try_init();
}

/// Route store logs to the test harness's captured output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(Verbosity::Normal.directive())
        .with_test_writer()
        .try_init();
}
