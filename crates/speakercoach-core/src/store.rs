//! Per-identity session storage used by the history log.
//!
//! The log never reaches for request-scoped state itself. Whatever resolves
//! the caller's identity hands it a [`SessionStore`] to read from and write to.

use anyhow::Result;
use chrono::Utc;
use speakercoach_storage::SessionDataStorage;
use std::time::Duration;

/// Two weeks, the usual server-side session lifetime.
pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(14 * 24 * 60 * 60);

pub trait SessionStore: Send + Sync {
    /// Stored blob for `identity`, or `None` if nothing live was saved.
    fn get(&self, identity: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, identity: &str, data: &[u8]) -> Result<()>;
}

/// Persistent sessions that expire `max_age` after their last write.
///
/// Expired sessions read as absent immediately; [`purge_expired`] deletes them.
///
/// [`purge_expired`]: RedbSessionStore::purge_expired
#[derive(Debug, Clone)]
pub struct RedbSessionStore {
    inner: SessionDataStorage,
    max_age: Duration,
}

impl RedbSessionStore {
    pub fn new(inner: SessionDataStorage, max_age: Duration) -> Self {
        Self { inner, max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Delete every expired session and return the identities removed.
    pub fn purge_expired(&self) -> Result<Vec<String>> {
        self.inner.purge_written_before(self.cutoff_ms())
    }

    /// Sessions last written before this instant are expired.
    fn cutoff_ms(&self) -> i64 {
        let max_age_ms = i64::try_from(self.max_age.as_millis()).unwrap_or(i64::MAX);
        Utc::now().timestamp_millis().saturating_sub(max_age_ms)
    }
}

impl SessionStore for RedbSessionStore {
    fn get(&self, identity: &str) -> Result<Option<Vec<u8>>> {
        match self.inner.get(identity)? {
            Some(row) if row.written_at_ms >= self.cutoff_ms() => Ok(Some(row.data)),
            _ => Ok(None),
        }
    }

    fn set(&self, identity: &str, data: &[u8]) -> Result<()> {
        self.inner.put(identity, data, Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
pub(crate) use memory::MemorySessionStore;

#[cfg(test)]
mod memory {
    use super::SessionStore;
    use anyhow::Result;
    use parking_lot::RwLock;
    use std::collections::HashMap;

    /// Process-local store for exercising the log without a database.
    #[derive(Debug, Default)]
    pub(crate) struct MemorySessionStore {
        entries: RwLock<HashMap<String, Vec<u8>>>,
    }

    impl MemorySessionStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }
    }

    impl SessionStore for MemorySessionStore {
        fn get(&self, identity: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.entries.read().get(identity).cloned())
        }

        fn set(&self, identity: &str, data: &[u8]) -> Result<()> {
            self.entries
                .write()
                .insert(identity.to_string(), data.to_vec());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn setup(max_age: Duration) -> (RedbSessionStore, SessionDataStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(Database::create(temp_dir.path().join("test.db")).unwrap());
        let inner = SessionDataStorage::new(db).unwrap();
        (RedbSessionStore::new(inner.clone(), max_age), inner, temp_dir)
    }

    #[test]
    fn test_set_then_get() {
        let (store, _, _dir) = setup(DEFAULT_SESSION_MAX_AGE);
        assert!(store.get("u1").unwrap().is_none());

        store.set("u1", b"[]").unwrap();
        assert_eq!(store.get("u1").unwrap().unwrap(), b"[]");
    }

    #[test]
    fn test_stale_session_reads_absent_and_is_purged() {
        let (store, inner, _dir) = setup(Duration::from_secs(60));
        let now = Utc::now().timestamp_millis();
        inner.put("stale", b"[]", now - 120_000).unwrap();
        store.set("fresh", b"[]").unwrap();

        assert!(store.get("stale").unwrap().is_none());
        assert!(store.get("fresh").unwrap().is_some());

        assert_eq!(store.purge_expired().unwrap(), vec!["stale".to_string()]);
        assert!(inner.get("stale").unwrap().is_none());
        assert!(inner.get("fresh").unwrap().is_some());
    }

    #[test]
    fn test_short_max_age_expires_after_write() {
        let (store, _, _dir) = setup(Duration::from_millis(1));
        store.set("u1", b"[]").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert!(store.get("u1").unwrap().is_none());
        assert_eq!(store.purge_expired().unwrap(), vec!["u1".to_string()]);
    }

    #[test]
    fn test_write_refreshes_expiry() {
        let (store, inner, _dir) = setup(Duration::from_secs(60));
        let now = Utc::now().timestamp_millis();
        inner.put("u1", b"[]", now - 120_000).unwrap();
        assert!(store.get("u1").unwrap().is_none());

        store.set("u1", b"[]").unwrap();
        assert!(store.get("u1").unwrap().is_some());
        assert!(store.purge_expired().unwrap().is_empty());
    }
}
