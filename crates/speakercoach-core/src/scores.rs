//! Typed wrapper around the score table, backing the dashboard.

use crate::models::Score;
use anyhow::Result;
use parking_lot::Mutex;
use speakercoach_storage::{ByteTable, ScoreStorage};

/// Dashboard scores per identity, stored oldest first and listed newest first.
///
/// Scores belong to a session: they are dropped with [`ScoreBoard::forget`]
/// when the owning session is purged.
pub struct ScoreBoard {
    inner: ScoreStorage,
    write_lock: Mutex<()>,
}

impl ScoreBoard {
    pub fn new(inner: ScoreStorage) -> Self {
        Self {
            inner,
            write_lock: Mutex::new(()),
        }
    }

    /// Record a new score for `identity`, dated now.
    pub fn record(&self, identity: &str, eye_contact_percentage: f64) -> Result<Score> {
        let _guard = self.write_lock.lock();

        let score = Score::new(eye_contact_percentage);
        let mut scores = self.load(identity)?;
        scores.push(score.clone());
        self.inner.put_raw(identity, &serde_json::to_vec(&scores)?)?;

        tracing::debug!(identity, total = scores.len(), "Recorded score");
        Ok(score)
    }

    /// All scores for `identity`, newest first.
    pub fn list(&self, identity: &str) -> Result<Vec<Score>> {
        let mut scores = self.load(identity)?;
        // Stored oldest first; reversing keeps same-instant scores newest first too.
        scores.reverse();
        scores.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(scores)
    }

    /// Drop every score recorded for `identity`.
    pub fn forget(&self, identity: &str) -> Result<bool> {
        let _guard = self.write_lock.lock();
        self.inner.remove(identity)
    }

    fn load(&self, identity: &str) -> Result<Vec<Score>> {
        match self.inner.get_raw(identity)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }
}
