//! Exclusive process-level lock on the database file.
//!
//! The lock is an advisory `flock`-style lock taken on our own handle to the
//! database file. It is polled until the configured timeout runs out, so a
//! second logbook process fails with [`Error::LockTimeout`] instead of hanging.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// How long to sleep between lock attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A held exclusive lock. Released on [`FileLock::release`] or drop.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    file: File,
}

impl FileLock {
    /// Open (creating with `mode` if absent) the file at `path` and lock it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseFile`] if the file cannot be opened or locking
    /// fails for a reason other than contention, and [`Error::LockTimeout`]
    /// if another holder keeps the lock for longer than `timeout`.
    pub fn acquire(path: &Path, mode: u32, timeout: Duration) -> Result<Self> {
        let file = open_file(path, mode).map_err(|source| Error::DatabaseFile {
            path: path.to_path_buf(),
            source,
        })?;

        let deadline = Instant::now() + timeout;
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => break,
                Err(err) if is_contended(&err) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(Error::LockTimeout {
                            path: path.to_path_buf(),
                            timeout,
                        });
                    }
                    trace!("Lock on {} is held elsewhere, retrying", path.display());
                    thread::sleep(POLL_INTERVAL.min(deadline - now));
                }
                Err(source) => {
                    return Err(Error::DatabaseFile {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        debug!("Acquired lock on {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the locked file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!("Released lock on {}", self.path.display());
    }
}

fn open_file(path: &Path, mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(mode)
        .open(path)
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
