//! Core entry types for logbook.
//!
//! An [`Entry`] is one logged contact: the station's call sign, the operator's
//! name, when the contact was logged (always UTC), and an identifier handed out
//! by the store when the entry is written.
//!
//! Encoding is done through the [`EntryCodec`] trait so the store can be built
//! with a different (or deliberately broken) codec.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single logged contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Identifier assigned by the store. Zero until the entry is persisted.
    pub id: u64,

    /// When this entry was created.
    pub created_at: DateTime<Utc>,

    /// Call sign of the contacted station. Used as the store key.
    pub call_sign: String,

    /// Name of the contacted operator.
    pub name: String,
}

impl Entry {
    /// Create a new, not yet persisted entry stamped with the current UTC time.
    #[must_use]
    pub fn new(call_sign: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            created_at: Utc::now(),
            call_sign: call_sign.into(),
            name: name.into(),
        }
    }

    /// The store key for this entry.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.call_sign.as_bytes()
    }

    /// Whether the store has assigned an id yet.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Encode this entry with the default [`JsonCodec`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        JsonCodec.encode(self)
    }

    /// Decode an entry with the default [`JsonCodec`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] if the bytes are empty, malformed or
    /// missing a field.
    pub fn decode(data: &[u8]) -> Result<Self> {
        JsonCodec.decode(data)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.call_sign, self.name)
    }
}

/// Strategy for turning entries into bytes and back.
///
/// The store holds one of these, so tests can swap in a codec that fails on
/// purpose without touching [`Entry`] itself.
pub trait EntryCodec: fmt::Debug + Send + Sync {
    /// Encode all fields of `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if any field cannot be serialized.
    fn encode(&self, entry: &Entry) -> Result<Vec<u8>>;

    /// Decode bytes produced by [`EntryCodec::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] on empty, truncated or malformed input.
    fn decode(&self, data: &[u8]) -> Result<Entry>;
}

/// Field-tagged JSON encoding.
///
/// ```text
/// {"id":1,"createdAt":"2018-06-01T17:04:05.123Z","callSign":"KYYZZ","name":"Test User"}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl EntryCodec for JsonCodec {
    fn encode(&self, entry: &Entry) -> Result<Vec<u8>> {
        serde_json::to_vec(entry).map_err(|e| Error::encoding(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Entry> {
        if data.is_empty() {
            return Err(Error::decoding("empty input"));
        }
        serde_json::from_slice(data).map_err(|e| Error::decoding(e.to_string()))
    }
}
