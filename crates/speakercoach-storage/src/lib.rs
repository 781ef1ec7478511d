//! SpeakerCoach Storage - byte-level persistence on top of redb.
//!
//! Each table maps a session identity to an opaque blob. Typed access lives
//! in speakercoach-core, which owns the serialization format.
//!
//! # Tables
//!
//! - `session_data` / `session_data:written_at` - server-side session payloads
//!   (session history) and their last write time
//! - `scores` - recorded eye contact scores

pub mod paths;
pub mod score;
pub mod session_data;

mod byte_table;

use anyhow::Result;
use redb::Database;
use std::path::Path;
use std::sync::Arc;

pub use byte_table::ByteTable;
pub use score::ScoreStorage;
pub use session_data::{SessionDataStorage, SessionRow};

/// Opens the database and initializes every table.
pub struct Storage {
    pub session_data: SessionDataStorage,
    pub scores: ScoreStorage,
}

impl Storage {
    /// Create the database file if it doesn't exist and make sure all tables are present.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Arc::new(Database::create(path)?);
        tracing::debug!(path = %path.display(), "Opened database");

        let session_data = SessionDataStorage::new(db.clone())?;
        let scores = ScoreStorage::new(db)?;

        Ok(Self {
            session_data,
            scores,
        })
    }
}
