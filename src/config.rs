//! Bot configuration
//!
//! Read from `{config_dir}/gloss/config.json`. A missing file yields the
//! defaults; CLI flags and `GLOSS_STORE` override the store path.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "gloss";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossConfig {
    /// Location of the glossary JSON file
    pub store_path: PathBuf,
    /// Name the bot uses for itself in replies
    pub bot_name: String,
    /// How many terms `recent` lists
    pub recent_limit: usize,
    /// Address the slash-command webhook binds to
    pub listen_addr: SocketAddr,
}

impl Default for GlossConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            bot_name: "Gloss".to_string(),
            recent_limit: 5,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl GlossConfig {
    /// Replace the store path when one was given on the command line
    pub fn with_store_path(mut self, store_path: Option<PathBuf>) -> Self {
        if let Some(path) = store_path {
            self.store_path = path;
        }
        self
    }
}

/// Get the path to the configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join(APP_DIR).join("config.json"))
}

/// Load the configuration from the default location
pub fn load_config() -> Result<GlossConfig> {
    load_config_from(&config_path()?)
}

/// Load the configuration from `path`, falling back to defaults if absent
pub fn load_config_from(path: &Path) -> Result<GlossConfig> {
    if !path.exists() {
        return Ok(GlossConfig::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: GlossConfig = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(config)
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("glossary.json")
}
