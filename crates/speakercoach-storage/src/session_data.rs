//! Session data storage - one serialized blob per session identity, plus the
//! time it was last written so stale sessions can be purged.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

const SESSION_DATA: TableDefinition<&str, &[u8]> = TableDefinition::new("session_data");
const SESSION_WRITTEN_AT: TableDefinition<&str, i64> =
    TableDefinition::new("session_data:written_at");

/// A stored session blob and its last write time in unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub data: Vec<u8>,
    pub written_at_ms: i64,
}

/// Server-side session payloads keyed by session identity.
#[derive(Debug, Clone)]
pub struct SessionDataStorage {
    db: Arc<Database>,
}

impl SessionDataStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SESSION_DATA)?;
        write_txn.open_table(SESSION_WRITTEN_AT)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Replace the blob for `key` and record `written_at_ms` as its last write.
    pub fn put(&self, key: &str, data: &[u8], written_at_ms: i64) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut data_table = write_txn.open_table(SESSION_DATA)?;
            data_table.insert(key, data)?;
            let mut written_table = write_txn.open_table(SESSION_WRITTEN_AT)?;
            written_table.insert(key, written_at_ms)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<SessionRow>> {
        let read_txn = self.db.begin_read()?;
        let data_table = read_txn.open_table(SESSION_DATA)?;
        let written_table = read_txn.open_table(SESSION_WRITTEN_AT)?;

        let Some(data) = data_table.get(key)? else {
            return Ok(None);
        };
        // Rows without a write time predate tracking and count as oldest.
        let written_at_ms = written_table
            .get(key)?
            .map(|value| value.value())
            .unwrap_or(i64::MIN);

        Ok(Some(SessionRow {
            data: data.value().to_vec(),
            written_at_ms,
        }))
    }

    /// Delete every session last written before `cutoff_ms`. Returns the removed keys.
    pub fn purge_written_before(&self, cutoff_ms: i64) -> Result<Vec<String>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut data_table = write_txn.open_table(SESSION_DATA)?;
            let mut written_table = write_txn.open_table(SESSION_WRITTEN_AT)?;

            let mut stale = Vec::new();
            for entry in data_table.iter()? {
                let (key, _) = entry?;
                let key = key.value().to_string();
                let written_at_ms = written_table
                    .get(key.as_str())?
                    .map(|value| value.value())
                    .unwrap_or(i64::MIN);
                if written_at_ms < cutoff_ms {
                    stale.push(key);
                }
            }

            for key in &stale {
                data_table.remove(key.as_str())?;
                written_table.remove(key.as_str())?;
            }
            stale
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (SessionDataStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        (SessionDataStorage::new(db).unwrap(), temp_dir)
    }

    #[test]
    fn test_missing_key_reads_none() {
        let (storage, _dir) = setup();
        assert!(storage.get("nobody").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_blob_and_write_time() {
        let (storage, _dir) = setup();

        storage.put("session-001", b"first", 100).unwrap();
        storage.put("session-001", b"second", 200).unwrap();

        let row = storage.get("session-001").unwrap().unwrap();
        assert_eq!(row.data, b"second");
        assert_eq!(row.written_at_ms, 200);
    }

    #[test]
    fn test_purge_removes_only_stale_rows() {
        let (storage, _dir) = setup();

        storage.put("old", b"[]", 1_000).unwrap();
        storage.put("edge", b"[]", 5_000).unwrap();
        storage.put("fresh", b"[]", 9_000).unwrap();

        let removed = storage.purge_written_before(5_000).unwrap();
        assert_eq!(removed, vec!["old".to_string()]);

        assert!(storage.get("old").unwrap().is_none());
        assert!(storage.get("edge").unwrap().is_some());
        assert!(storage.get("fresh").unwrap().is_some());
        assert!(storage.purge_written_before(5_000).unwrap().is_empty());
    }
}
