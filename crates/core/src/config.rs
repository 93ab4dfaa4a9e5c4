//! Application configuration.
//!
//! Values are layered from built-in defaults, an optional JSON file under the
//! user's config directory and `CHARSHEET_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the platform config dir holding `config.json`.
pub const CONFIG_DIR: &str = "charsheet";
/// Default character document, relative to the working directory.
pub const DEFAULT_CHARACTER_FILE: &str = "characterData.json";
/// Default recipe catalog, relative to the working directory.
pub const DEFAULT_RECIPES_FILE: &str = "craftRecipes.json";

const ENV_PREFIX: &str = "CHARSHEET";

/// Resolved settings for a single run of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the persisted character document.
    pub character_path: PathBuf,
    /// Location of the read-only recipe catalog.
    pub recipes_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            character_path: PathBuf::from(DEFAULT_CHARACTER_FILE),
            recipes_path: PathBuf::from(DEFAULT_RECIPES_FILE),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration using `path` as the optional file layer.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("character_path", DEFAULT_CHARACTER_FILE)?
            .set_default("recipes_path", DEFAULT_RECIPES_FILE)?
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to load config from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid config in {}", path.display()))
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.json")
}

/// Write the default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let serialized = serde_json::to_string_pretty(&AppConfig::default())
        .context("failed to serialize default config")?;
    fs::write(path, serialized).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Default config written");
    Ok(())
}
