//! Error types for logbook.
//!
//! This module defines all error types used throughout the logbook crate,
//! carrying the path, bucket or key involved so failures can be diagnosed
//! from the message alone.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The main error type for logbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Open Errors ===
    /// Failed to create or open the backing database file.
    #[error("failed to open database file {path}: {source}")]
    DatabaseFile {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open the embedded database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// The exclusive lock on the database file was not acquired in time.
    #[error("timed out after {timeout:?} waiting for lock on {path}")]
    LockTimeout {
        /// Path to the database file.
        path: PathBuf,
        /// How long we waited.
        timeout: Duration,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Store Errors ===
    /// An operation was attempted before the store was opened.
    #[error("store is not open")]
    NotOpen,

    /// The bucket does not exist.
    #[error("bucket {bucket:?} not found")]
    BucketNotFound {
        /// Name of the bucket.
        bucket: String,
    },

    /// No value is stored under the key.
    #[error("key {key:?} not found in bucket {bucket:?}")]
    KeyNotFound {
        /// Name of the bucket.
        bucket: String,
        /// The key, lossily rendered as text.
        key: String,
    },

    /// A write was attempted with an empty key.
    #[error("key required for put into bucket {bucket:?}")]
    KeyRequired {
        /// Name of the bucket.
        bucket: String,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Codec Errors ===
    /// An entry could not be encoded.
    #[error("failed to encode entry: {message}")]
    Encoding {
        /// Description of what went wrong.
        message: String,
    },

    /// Stored bytes could not be decoded into an entry.
    #[error("failed to decode entry: {message}")]
    Decoding {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// User input was rejected.
    #[error("invalid input: {message}")]
    Input {
        /// Description of the problem.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for logbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a new decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    /// Create a new input error.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a key-not-found error, rendering the key as text.
    #[must_use]
    pub fn key_not_found(bucket: impl Into<String>, key: &[u8]) -> Self {
        Self::KeyNotFound {
            bucket: bucket.into(),
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    /// Check if this error means the bucket or key does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BucketNotFound { .. } | Self::KeyNotFound { .. })
    }

    /// Check if this error means the store was used before being opened.
    #[must_use]
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }

    /// Check if this error came from opening the store.
    #[must_use]
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseFile { .. }
                | Self::DatabaseOpen { .. }
                | Self::LockTimeout { .. }
                | Self::DirectoryCreate { .. }
        )
    }
}
