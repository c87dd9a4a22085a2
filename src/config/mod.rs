//! Environment-backed configuration.
//!
//! All settings have defaults. Override with `TALLY_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_MERGE_DELAY_MS;

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TALLY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for persisted batch records. Default: `./.data/batches`.
    pub batch_path: PathBuf,

    /// Directory for persisted snapshots. Default: `./.data/snapshots`.
    pub snapshot_path: PathBuf,

    /// Delay between an append and the triggered merge run, in
    /// milliseconds. Default: [`DEFAULT_MERGE_DELAY_MS`].
    pub merge_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_path: PathBuf::from("./.data/batches"),
            snapshot_path: PathBuf::from("./.data/snapshots"),
            merge_delay_ms: DEFAULT_MERGE_DELAY_MS,
        }
    }
}

impl Config {
    const ENV_BATCH_PATH: &'static str = "TALLY_BATCH_PATH";
    const ENV_SNAPSHOT_PATH: &'static str = "TALLY_SNAPSHOT_PATH";
    const ENV_MERGE_DELAY_MS: &'static str = "TALLY_MERGE_DELAY_MS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let batch_path = Self::parse_path_from_env(Self::ENV_BATCH_PATH, defaults.batch_path);
        let snapshot_path =
            Self::parse_path_from_env(Self::ENV_SNAPSHOT_PATH, defaults.snapshot_path);
        let merge_delay_ms = Self::parse_delay_from_env(defaults.merge_delay_ms)?;

        Ok(Self {
            batch_path,
            snapshot_path,
            merge_delay_ms,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.batch_path, &self.snapshot_path] {
            if path.exists() && !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }
        Ok(())
    }

    /// Returns the merge delay as a [`Duration`].
    pub fn merge_delay(&self) -> Duration {
        Duration::from_millis(self.merge_delay_ms)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_delay_from_env(default: u64) -> Result<u64, ConfigError> {
        match env::var(Self::ENV_MERGE_DELAY_MS) {
            Ok(value) => value.parse().map_err(|e| ConfigError::DelayParseError {
                value: value.clone(),
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
