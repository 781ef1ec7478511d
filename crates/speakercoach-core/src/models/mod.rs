pub mod score;
pub mod session_record;

pub use score::Score;
pub use session_record::{PayloadError, SessionRecord, Timestamp};
