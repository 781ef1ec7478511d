//! Data directory resolution.

use anyhow::Result;
use std::path::PathBuf;

const SPEAKERCOACH_DIR: &str = ".speakercoach";
const DB_FILE: &str = "speakercoach.db";

/// Environment variable to override the data directory.
const SPEAKERCOACH_DIR_ENV: &str = "SPEAKERCOACH_DIR";

/// Priority: SPEAKERCOACH_DIR env var > ~/.speakercoach/
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(SPEAKERCOACH_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(SPEAKERCOACH_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Create the data directory if needed and return the database file path in it.
pub fn ensure_database_path() -> Result<PathBuf> {
    let dir = resolve_data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(DB_FILE))
}
