mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file location: <platform config dir>/ocean-view/config.toml
pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("could not determine config directory")?
        .join("ocean-view");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("config.toml"))
}

impl AppConfig {
    /// Load from the default location, falling back to defaults when no
    /// file exists yet.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            info!("No config found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        info!(?path, "Loaded config");
        Ok(config)
    }

    /// Write back to the default location.
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        info!(?path, "Saved config");
        Ok(())
    }
}
