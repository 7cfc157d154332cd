//! Engine configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

/// Environment variable overriding [`EngineConfig::db_path`].
pub const DB_PATH_ENV: &str = "INLINE_TICTACTOE_DB";

/// Which key-value backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// SQLite file at `db_path`.
    #[default]
    #[display("sqlite")]
    Sqlite,
    /// Process memory; games vanish on exit.
    #[display("memory")]
    Memory,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Display)]
pub enum ConfigSource {
    /// Built-in defaults; no file was read.
    #[default]
    #[display("defaults")]
    Defaults,
    /// Read from this TOML file.
    #[display("{}", _0.display())]
    File(PathBuf),
}

/// Engine configuration, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Storage backend.
    #[serde(default)]
    store: StoreKind,

    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Mark assignment for games started to replace a missing one.
    #[serde(default = "default_first_player_is_mark1")]
    default_first_player_is_mark1: bool,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Origin of these values, reported once logging is up.
    #[serde(skip)]
    source: ConfigSource,

    /// Whether `db_path` came from the environment.
    #[serde(skip)]
    db_path_from_env: bool,
}

#[instrument]
fn default_db_path() -> String {
    "inline_tictactoe.db".to_string()
}

#[instrument]
fn default_first_player_is_mark1() -> bool {
    true
}

#[instrument]
fn default_log_filter() -> String {
    "info,inline_tictactoe=debug,inline_tictactoe_server=debug".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            db_path: default_db_path(),
            default_first_player_is_mark1: default_first_player_is_mark1(),
            log_filter: default_log_filter(),
            source: ConfigSource::Defaults,
            db_path_from_env: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.source = ConfigSource::File(path.as_ref().to_path_buf());

        info!(store = %config.store, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults. The database
    /// path environment variable is applied afterwards.
    ///
    /// This usually runs before a subscriber is installed; [`source`] and
    /// [`db_path_from_env`] let the caller report the outcome afterwards.
    ///
    /// [`source`]: Self::source
    /// [`db_path_from_env`]: Self::db_path_from_env
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("Config file not found, using defaults");
            Self::default()
        };

        Ok(match std::env::var(DB_PATH_ENV) {
            Ok(db_path) if !db_path.is_empty() => {
                let mut config = config.with_db_path(db_path);
                config.db_path_from_env = true;
                config
            }
            _ => config,
        })
    }

    /// Replaces the database path.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self.db_path_from_env = false;
        self
    }

    /// Replaces the storage backend.
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the SQLite database cannot be opened.
    #[instrument(skip(self), fields(store = %self.store))]
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        match self.store {
            StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreKind::Sqlite => Ok(Arc::new(SqliteStore::open(&self.db_path)?)),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
