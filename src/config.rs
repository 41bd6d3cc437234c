//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command line overrides applied by the CLI.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BOARD_FILE, DEFAULT_RANKING_FILE,
    DEFAULT_SUBJECT_PREFIX, ENV_DATA_DIR, ENV_OUTBOX_DIR,
};
use crate::error::{RankingError, Result};
use crate::persistence::RankingStore;
use crate::registry::StationRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for the frost ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Directory holding the ranking and board files
    pub data_dir: PathBuf,

    /// Ranking state file name, relative to `data_dir`
    pub ranking_file: String,

    /// Rendered board file name, relative to `data_dir`
    pub board_file: String,

    /// Prefix for notification subjects
    pub subject_prefix: String,

    /// Directory receiving notification files (stdout when unset)
    pub outbox_dir: Option<PathBuf>,

    /// KNMI export used when `update` is given no input file
    pub knmi_export: Option<PathBuf>,

    /// Extra or renamed stations, KNMI id to display name
    pub stations: HashMap<String, String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            ranking_file: DEFAULT_RANKING_FILE.to_string(),
            board_file: DEFAULT_BOARD_FILE.to_string(),
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_string(),
            outbox_dir: None,
            knmi_export: None,
            stations: HashMap::new(),
        }
    }
}

impl RankingConfig {
    /// Default config file location (`<config dir>/frost-ranking/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| RankingError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RankingError::persistence(path, e))?;
        Self::from_toml(&content, path)
    }

    /// Defaults, then `config_file` if given, then the process environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides data_dir", ENV_DATA_DIR);
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTBOX_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides outbox_dir", ENV_OUTBOX_DIR);
            self.outbox_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Send notifications to an outbox directory
    pub fn with_outbox_dir(mut self, outbox_dir: impl Into<PathBuf>) -> Self {
        self.outbox_dir = Some(outbox_dir.into());
        self
    }

    /// Check settings that would otherwise fail late in a run
    pub fn validate(&self) -> Result<()> {
        if self.ranking_file.trim().is_empty() {
            return Err(RankingError::configuration("ranking_file must not be empty"));
        }
        if self.board_file.trim().is_empty() {
            return Err(RankingError::configuration("board_file must not be empty"));
        }
        if self.ranking_file == self.board_file {
            return Err(RankingError::configuration(format!(
                "ranking_file and board_file both point to '{}'",
                self.ranking_file
            )));
        }
        if self.subject_prefix.trim().is_empty() {
            return Err(RankingError::configuration("subject_prefix must not be empty"));
        }
        if let Some((id, _)) = self.stations.iter().find(|(_, name)| name.contains(',')) {
            return Err(RankingError::configuration(format!(
                "station name for id {} must not contain a comma",
                id
            )));
        }
        Ok(())
    }

    /// Store for the configured ranking and board files
    pub fn store(&self) -> RankingStore {
        RankingStore::new(
            self.data_dir.join(&self.ranking_file),
            self.data_dir.join(&self.board_file),
        )
    }

    /// KNMI registry extended with configured stations
    pub fn registry(&self) -> StationRegistry {
        StationRegistry::knmi().with_overrides(&self.stations)
    }
}
