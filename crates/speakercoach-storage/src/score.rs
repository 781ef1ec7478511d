//! Score storage - per-identity list of recorded eye contact scores.

use crate::byte_table;

byte_table! {
    /// Serialized score lists keyed by session identity.
    pub struct ScoreStorage { table: "scores" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteTable;
    use redb::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_and_remove() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(Database::create(temp_dir.path().join("test.db")).unwrap());
        let scores = ScoreStorage::new(db.clone()).unwrap();
        let sessions = crate::SessionDataStorage::new(db).unwrap();

        scores.put_raw("u1", b"[]").unwrap();

        assert_eq!(scores.get_raw("u1").unwrap().unwrap(), b"[]");
        assert!(sessions.get("u1").unwrap().is_none());

        assert!(scores.remove("u1").unwrap());
        assert!(!scores.remove("u1").unwrap());
        assert!(scores.get_raw("u1").unwrap().is_none());
    }
}
