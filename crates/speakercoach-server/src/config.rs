use anyhow::{Context, bail};
use serde::Deserialize;
use speakercoach_core::{CoreConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_SESSION_MAX_AGE, paths};
use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub history_capacity: NonZeroUsize,
    pub session_max_age: Duration,
    /// Falls back to the data directory when unset.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    history: HistorySection,
    #[serde(default)]
    session: SessionSection,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistorySection {
    #[serde(default = "default_capacity")]
    capacity: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    #[serde(default = "default_max_age_secs")]
    max_age_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct StorageSection {
    #[serde(default)]
    database_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY.get()
}

fn default_max_age_secs() -> u64 {
    DEFAULT_SESSION_MAX_AGE.as_secs()
}

impl ServerConfig {
    /// Config file if one is present, otherwise environment variables.
    pub fn load() -> anyhow::Result<Self> {
        match config_file_path() {
            Some(path) => Self::from_file(&path),
            None => Self::from_env(),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let parsed: FileConfig = toml::from_str(contents)?;
        Ok(Self {
            host: parsed.server.host,
            port: parsed.server.port,
            history_capacity: validate_capacity(parsed.history.capacity)?,
            session_max_age: validate_max_age(parsed.session.max_age_secs)?,
            database_path: parsed.storage.database_path,
        })
    }

    fn from_env() -> anyhow::Result<Self> {
        let host = env::var("SPEAKERCOACH_SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("SPEAKERCOACH_SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let capacity = match env::var("SPEAKERCOACH_HISTORY_CAPACITY") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid SPEAKERCOACH_HISTORY_CAPACITY: {}", value))?,
            Err(_) => default_capacity(),
        };
        let max_age_secs = match env::var("SPEAKERCOACH_SESSION_MAX_AGE_SECS") {
            Ok(value) => value.trim().parse::<u64>().with_context(|| {
                format!("Invalid SPEAKERCOACH_SESSION_MAX_AGE_SECS: {}", value)
            })?,
            Err(_) => default_max_age_secs(),
        };

        Ok(Self {
            host,
            port,
            history_capacity: validate_capacity(capacity)?,
            session_max_age: validate_max_age(max_age_secs)?,
            database_path: None,
        })
    }

    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            history_capacity: self.history_capacity,
            session_max_age: self.session_max_age,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured database path, or `speakercoach.db` in the data directory.
    pub fn resolve_database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.database_path {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                Ok(path.clone())
            }
            None => paths::ensure_database_path(),
        }
    }
}

fn validate_capacity(capacity: usize) -> anyhow::Result<NonZeroUsize> {
    match NonZeroUsize::new(capacity) {
        Some(capacity) => Ok(capacity),
        None => bail!("History capacity must be at least 1"),
    }
}

fn validate_max_age(secs: u64) -> anyhow::Result<Duration> {
    if secs == 0 {
        bail!("Session max age must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("SPEAKERCOACH_SERVER_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let local = Path::new("server.toml");
    local.exists().then(|| local.to_path_buf())
}
