//! SpeakerCoach core: session history, scores, and the shared application state.

pub mod history;
pub mod models;
pub mod scores;
pub mod store;

pub use history::{BoundedHistoryLog, DEFAULT_HISTORY_CAPACITY, HistoryError};
pub use models::*;
pub use scores::ScoreBoard;
pub use speakercoach_storage::paths;
pub use store::{DEFAULT_SESSION_MAX_AGE, RedbSessionStore, SessionStore};

use speakercoach_storage::Storage;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Tunables for [`AppCore`].
#[derive(Debug, Clone, Copy)]
pub struct CoreConfig {
    pub history_capacity: NonZeroUsize,
    /// Sessions expire this long after their last write.
    pub session_max_age: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            session_max_age: DEFAULT_SESSION_MAX_AGE,
        }
    }
}

/// Application state shared by every request handler.
pub struct AppCore {
    pub sessions: RedbSessionStore,
    pub history: BoundedHistoryLog<RedbSessionStore>,
    pub scores: ScoreBoard,
}

impl AppCore {
    /// Open the database, wire the components, and drop sessions that
    /// expired while the server was down.
    pub fn new(db_path: impl AsRef<Path>, config: CoreConfig) -> anyhow::Result<Self> {
        let storage = Storage::new(db_path)?;

        let sessions = RedbSessionStore::new(storage.session_data, config.session_max_age);
        let history = BoundedHistoryLog::with_capacity(sessions.clone(), config.history_capacity);
        let scores = ScoreBoard::new(storage.scores);

        info!(
            capacity = config.history_capacity.get(),
            session_max_age_secs = config.session_max_age.as_secs(),
            "Initializing SpeakerCoach"
        );

        let core = Self {
            sessions,
            history,
            scores,
        };
        core.purge_expired_sessions()?;
        Ok(core)
    }

    /// The presented identity, if it names a live session.
    ///
    /// Identities the server never issued, or whose session expired, are
    /// not honored.
    pub fn live_session(&self, presented: Option<&str>) -> Result<Option<String>, HistoryError> {
        match presented {
            Some(identity) if self.history.exists(identity)? => Ok(Some(identity.to_string())),
            _ => Ok(None),
        }
    }

    /// Delete expired sessions together with their scores.
    pub fn purge_expired_sessions(&self) -> anyhow::Result<usize> {
        let removed = self.sessions.purge_expired()?;
        for identity in &removed {
            self.scores.forget(identity)?;
        }
        if !removed.is_empty() {
            info!(count = removed.len(), "Purged expired sessions");
        }
        Ok(removed.len())
    }
}
