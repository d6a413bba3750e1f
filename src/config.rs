// Pillbox — Configuration
//
// Resolves where the store lives and how long callers wait on it.
// Precedence: CLI flags, then environment, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::DEFAULT_TIMEOUT;
use crate::error::{PillboxError, Result};

/// Overrides the data directory (default `~/.pillbox`).
pub const HOME_ENV: &str = "PILLBOX_HOME";

/// Overrides the per-operation deadline, in whole seconds.
pub const TIMEOUT_ENV: &str = "PILLBOX_TIMEOUT_SECS";

const DB_FILE_NAME: &str = "pillbox.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    home: PathBuf,
    timeout: Duration,
}

impl Config {
    /// Build a config rooted at `home` with the default timeout.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve from explicit overrides, falling back to the environment and
    /// then to defaults.
    pub fn resolve(home: Option<PathBuf>, timeout_secs: Option<u64>) -> Result<Self> {
        let home = match home {
            Some(path) => path,
            None => match std::env::var_os(HOME_ENV) {
                Some(path) if !path.is_empty() => PathBuf::from(path),
                _ => default_home()?,
            },
        };

        let timeout = match timeout_secs {
            Some(secs) => timeout_from_secs(secs)?,
            None => match std::env::var(TIMEOUT_ENV) {
                Ok(raw) => parse_timeout(&raw)?,
                Err(_) => DEFAULT_TIMEOUT,
            },
        };

        Ok(Self { home, timeout })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path to the store file inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.home.join(DB_FILE_NAME)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn default_home() -> Result<PathBuf> {
    dirs_next::home_dir()
        .map(|home| home.join(".pillbox"))
        .ok_or_else(|| {
            PillboxError::Config(format!(
                "could not determine home directory; set {}",
                HOME_ENV
            ))
        })
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        PillboxError::Config(format!(
            "{} must be a whole number of seconds, got '{}'",
            TIMEOUT_ENV, raw
        ))
    })?;
    timeout_from_secs(secs)
}

fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(PillboxError::Config(
            "timeout must be at least one second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
