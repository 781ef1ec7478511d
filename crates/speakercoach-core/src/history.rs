//! Bounded, append-only history of speaking session results.
//!
//! Each identity owns an ordered list of [`SessionRecord`]s, oldest first.
//! Appending past capacity drops the oldest entries; nothing is ever
//! reordered, so two records with the same timestamp keep insertion order.

use crate::models::{PayloadError, SessionRecord};
use crate::store::SessionStore;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::debug;

/// Number of records kept per identity unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: NonZeroUsize = NonZeroUsize::new(10).unwrap();

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Stored history is unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Capacity-limited, insertion-ordered session history per identity.
///
/// Reads and writes go through the injected [`SessionStore`]; the log keeps
/// no per-identity state of its own.
pub struct BoundedHistoryLog<S> {
    store: S,
    capacity: NonZeroUsize,
    // Serializes load-append-save so concurrent appends don't drop records.
    write_lock: Mutex<()>,
}

impl<S: SessionStore> BoundedHistoryLog<S> {
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(store: S, capacity: NonZeroUsize) -> Self {
        Self {
            store,
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Append `record` to the end of `identity`'s history, evicting the
    /// oldest entries so at most `capacity` remain.
    pub fn append(&self, identity: &str, record: SessionRecord) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock();

        let mut entries = self.read(identity)?;
        entries.push(record);

        let capacity = self.capacity.get();
        if entries.len() > capacity {
            let overflow = entries.len() - capacity;
            entries.drain(..overflow);
        }

        self.save(identity, &entries)?;

        debug!(identity, len = entries.len(), "Appended session record");
        Ok(())
    }

    /// Rewrite `identity`'s history unchanged, creating an empty one if
    /// none is stored. Keeps the session alive without recording anything.
    pub fn touch(&self, identity: &str) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock();
        let entries = self.read(identity)?;
        self.save(identity, &entries)
    }

    /// Whether `identity` has a live stored history.
    pub fn exists(&self, identity: &str) -> Result<bool, HistoryError> {
        Ok(self.store.get(identity)?.is_some())
    }

    /// Parse a raw payload and append it.
    ///
    /// A payload that fails to parse leaves the stored history untouched.
    pub fn append_payload(&self, identity: &str, payload: &[u8]) -> Result<(), HistoryError> {
        let record = SessionRecord::from_json_slice(payload)?;
        self.append(identity, record)
    }

    /// Current history for `identity`, oldest first. Empty if none exists.
    pub fn read(&self, identity: &str) -> Result<Vec<SessionRecord>, HistoryError> {
        match self.store.get(identity)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(HistoryError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, identity: &str, entries: &[SessionRecord]) -> Result<(), HistoryError> {
        let bytes = serde_json::to_vec(entries).map_err(HistoryError::Encode)?;
        self.store.set(identity, &bytes)?;
        Ok(())
    }
}
