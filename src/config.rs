//! TOML configuration for the explorer.
//!
//! Looked up at `$RANKINGS_EXPLORER_CONFIG`, falling back to `rankings.toml`
//! in the working directory. A missing file means defaults.
//!
//! ```toml
//! [data]
//! path = "data/rankings.csv"
//!
//! [dashboard]
//! top_n = 20
//! elite_threshold = 90.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::aggregate::TOP_N;

pub const CONFIG_ENV: &str = "RANKINGS_EXPLORER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "rankings.toml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    /// Dataset loaded at start-up.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardSettings {
    /// Length of the ranked subset.
    pub top_n: usize,
    /// Initial value of the threshold explorer slider (80-100).
    pub elite_threshold: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_n: TOP_N,
            elite_threshold: 90.0,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load from `$RANKINGS_EXPLORER_CONFIG` or `./rankings.toml`.
    pub fn discover() -> Result<Self, SettingsError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.dashboard.top_n == 0 {
            return Err(SettingsError::InvalidConfig(
                "dashboard.top_n must be at least 1".into(),
            ));
        }
        if !(80.0..=100.0).contains(&self.dashboard.elite_threshold) {
            return Err(SettingsError::InvalidConfig(format!(
                "dashboard.elite_threshold must be within 80-100, got {}",
                self.dashboard.elite_threshold
            )));
        }
        Ok(())
    }
}
