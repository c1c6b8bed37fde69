//! Storage layer for logbook.
//!
//! This module provides a small bucketed key/value store on top of an
//! embedded `SQLite` database. A [`Store`] owns the database handle and an
//! exclusive lock on the backing file between [`Store::open`] and
//! [`Store::close`]; every operation runs in its own transaction.

mod lock;
pub mod schema;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::entry::{Entry, EntryCodec, JsonCodec};
use crate::error::{Error, Result};

pub use lock::FileLock;

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "my.db";

/// Default permissions for a newly created database file.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Default time to wait for the file lock.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default bucket holding all entries.
pub const DEFAULT_BUCKET: &str = "users";

/// Settings a [`Store`] is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Path to the database file.
    pub path: PathBuf,
    /// Permissions used when the file has to be created.
    pub file_mode: u32,
    /// How long [`Store::open`] waits for the exclusive lock.
    pub timeout: Duration,
    /// Bucket all operations act on.
    pub bucket: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            file_mode: DEFAULT_FILE_MODE,
            timeout: DEFAULT_TIMEOUT,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl StoreOptions {
    /// Default options pointing at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// An owned key/value pair read out of a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The key bytes.
    pub key: Vec<u8>,
    /// The encoded value bytes.
    pub value: Vec<u8>,
}

/// Live database state, present only while the store is open.
///
/// Field order matters: the connection is closed before the lock is released.
#[derive(Debug)]
struct Handle {
    conn: Connection,
    lock: FileLock,
}

/// Client for the bucketed entry store.
pub struct Store {
    options: StoreOptions,
    codec: Box<dyn EntryCodec>,
    handle: Option<Handle>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("options", &self.options)
            .field("codec", &self.codec)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Store {
    /// Create a closed store that encodes entries with `codec`.
    #[must_use]
    pub fn new(options: StoreOptions, codec: Box<dyn EntryCodec>) -> Self {
        Self {
            options,
            codec,
            handle: None,
        }
    }

    /// Create a closed store using the JSON codec.
    #[must_use]
    pub fn with_defaults(options: StoreOptions) -> Self {
        Self::new(options, Box::new(JsonCodec))
    }

    /// Open a store, run `f`, and close the store again whatever `f` returns.
    ///
    /// # Errors
    ///
    /// Returns the error from opening the store or the error returned by `f`.
    pub fn session<T>(
        options: StoreOptions,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        Self::with_defaults(options).scoped(f)
    }

    /// Open this store, run `f`, and close it on every path.
    ///
    /// # Errors
    ///
    /// Returns the error from opening the store or the error returned by `f`.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.open()?;
        let result = f(self);
        self.close();
        result
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.options.path
    }

    /// Name of the bucket this store reads and writes.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.options.bucket
    }

    /// Whether [`Store::open`] has succeeded and [`Store::close`] not yet run.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Open the database, creating the file and bucket if they don't exist.
    ///
    /// Creates the parent directories if needed, then takes an exclusive lock
    /// on the file, waiting at most the configured timeout. Each step only
    /// runs if the previous one succeeded. Calling this on an open store does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, the lock
    /// is not acquired in time, or the database or bucket cannot be set up.
    pub fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            debug!("Store at {} is already open", self.options.path.display());
            return Ok(());
        }

        let path = self.options.path.clone();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let lock = FileLock::acquire(&path, self.options.file_mode, self.options.timeout)?;

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.busy_timeout(self.options.timeout)
            .map_err(|source| Error::DatabaseOpen {
                path: path.clone(),
                source,
            })?;

        if schema::initialize(&mut conn, &self.options.bucket)? {
            info!("Created bucket {:?} in {}", self.options.bucket, path.display());
        }

        self.handle = Some(Handle { conn, lock });
        debug!("Database opened at {}", path.display());
        Ok(())
    }

    /// Close the database and release the file lock.
    ///
    /// Does nothing if the store is not open.
    pub fn close(&mut self) {
        let Some(Handle { conn, lock }) = self.handle.take() else {
            return;
        };

        if let Err((_, err)) = conn.close() {
            warn!(
                "Error closing database at {}: {}",
                self.options.path.display(),
                err
            );
        }
        lock.release();
        debug!("Closed database at {}", self.options.path.display());
    }

    /// Store `entry` under `key`, assigning it the bucket's next id.
    ///
    /// The id is taken from the bucket sequence, the entry is encoded, and the
    /// bytes replace whatever `key` held before, all in one write transaction.
    /// If anything fails the transaction is rolled back, the sequence is left
    /// untouched and `entry.id` keeps its previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`], [`Error::KeyRequired`] for an empty key,
    /// [`Error::BucketNotFound`], [`Error::Encoding`], or a database error.
    pub fn put(&mut self, key: &[u8], entry: &mut Entry) -> Result<()> {
        let handle = self.handle.as_mut().ok_or(Error::NotOpen)?;
        let bucket = self.options.bucket.as_str();
        if key.is_empty() {
            return Err(Error::KeyRequired {
                bucket: bucket.to_string(),
            });
        }

        let tx = handle
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = next_sequence(&tx, bucket)?;
        let previous = entry.id;
        entry.id = id;

        let stored = self.codec.encode(entry).and_then(|encoded| {
            tx.execute(schema::UPSERT_PAIR, params![bucket, key, encoded])?;
            tx.commit()?;
            Ok(())
        });
        if let Err(err) = stored {
            entry.id = previous;
            return Err(err);
        }

        debug!("Stored entry {} in bucket {:?}", entry, bucket);
        Ok(())
    }

    /// Store `entry` under its own call sign.
    ///
    /// # Errors
    ///
    /// Everything [`Store::put`] returns.
    pub fn put_entry(&mut self, entry: &mut Entry) -> Result<()> {
        let key = entry.key().to_vec();
        self.put(&key, entry)
    }

    /// Fetch the encoded value stored under `key`.
    ///
    /// The bytes are copied out before the read transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`], [`Error::BucketNotFound`],
    /// [`Error::KeyNotFound`], or a database error.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let handle = self.handle.as_ref().ok_or(Error::NotOpen)?;
        let bucket = self.options.bucket.as_str();

        let tx = handle.conn.unchecked_transaction()?;
        ensure_bucket(&tx, bucket)?;

        let value: Option<Vec<u8>> = tx
            .query_row(schema::SELECT_VALUE, params![bucket, key], |row| row.get(0))
            .optional()?;
        tx.commit()?;

        debug!(
            "Lookup of {:?} in bucket {:?}: {}",
            String::from_utf8_lossy(key),
            bucket,
            if value.is_some() { "hit" } else { "miss" }
        );
        value.ok_or_else(|| Error::key_not_found(bucket, key))
    }

    /// Fetch and decode the entry stored under `key`.
    ///
    /// # Errors
    ///
    /// Everything [`Store::get`] returns, plus [`Error::Decoding`].
    pub fn get_entry(&self, key: &[u8]) -> Result<Entry> {
        let value = self.get(key)?;
        self.codec.decode(&value)
    }

    /// Every pair in the bucket, ordered by key bytes.
    ///
    /// An empty bucket yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`], [`Error::BucketNotFound`], or a database
    /// error.
    pub fn list(&self) -> Result<Vec<Pair>> {
        let handle = self.handle.as_ref().ok_or(Error::NotOpen)?;
        let bucket = self.options.bucket.as_str();

        let tx = handle.conn.unchecked_transaction()?;
        ensure_bucket(&tx, bucket)?;

        let pairs = {
            let mut stmt = tx.prepare(schema::SELECT_PAIRS)?;
            let rows = stmt.query_map([bucket], |row| {
                Ok(Pair {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };
        tx.commit()?;

        debug!("Listed {} pairs from bucket {:?}", pairs.len(), bucket);
        Ok(pairs)
    }

    /// Every entry in the bucket, decoded, ordered by key bytes.
    ///
    /// # Errors
    ///
    /// Everything [`Store::list`] returns, plus [`Error::Decoding`] for the
    /// first value that fails to decode.
    pub fn list_entries(&self) -> Result<Vec<Entry>> {
        self.list()?
            .iter()
            .map(|pair| self.codec.decode(&pair.value))
            .collect()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}

fn ensure_bucket(tx: &Transaction<'_>, bucket: &str) -> Result<()> {
    let exists = tx
        .query_row(schema::BUCKET_EXISTS, [bucket], |_| Ok(()))
        .optional()?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(Error::BucketNotFound {
            bucket: bucket.to_string(),
        })
    }
}

/// Advance and return the bucket's sequence. The first call yields 1.
fn next_sequence(tx: &Transaction<'_>, bucket: &str) -> Result<u64> {
    if tx.execute(schema::ADVANCE_SEQUENCE, [bucket])? == 0 {
        return Err(Error::BucketNotFound {
            bucket: bucket.to_string(),
        });
    }
    let sequence: i64 = tx.query_row(schema::SELECT_SEQUENCE, [bucket], |row| row.get(0))?;
    u64::try_from(sequence)
        .map_err(|_| Error::DatabaseQuery(rusqlite::Error::IntegralValueOutOfRange(0, sequence)))
}
