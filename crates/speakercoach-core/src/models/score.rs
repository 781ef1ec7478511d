use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded eye contact result shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub eye_contact_percentage: f64,
    /// Assigned by the server when the score is recorded.
    pub date: DateTime<Utc>,
}

impl Score {
    pub fn new(eye_contact_percentage: f64) -> Self {
        Self {
            eye_contact_percentage,
            date: Utc::now(),
        }
    }
}
