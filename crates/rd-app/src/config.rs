//! Application configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use rd_core::ViewportSettings;
use rd_data::DatasetConfig;
use rd_ui::Theme;
use rd_views::{MapConfig, TableConfig};

pub const DEFAULT_CONFIG_FILE: &str = "restodash.json";
pub const CONFIG_ENV_VAR: &str = "RESTODASH_CONFIG";
pub const WINDOW_TITLE: &str = "Dashboard Restaurants";

/// Top-level configuration, read from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub viewport: ViewportSettings,
    pub table: TableConfig,
    pub map: MapConfig,
    pub theme: Theme,
}

impl AppConfig {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}

/// Config path from the first CLI argument, then the environment, then the default
pub fn config_path(cli_arg: Option<String>, env_value: Option<String>) -> PathBuf {
    cli_arg
        .or(env_value)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
