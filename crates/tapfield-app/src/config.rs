//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial window width in logical pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial window height in logical pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_title() -> String {
    "Tapfield".to_string()
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Directory holding scene and action resources
    #[serde(default = "default_resources_path")]
    pub path: PathBuf,
    /// Scene resource to present
    #[serde(default = "default_scene")]
    pub scene: String,
    /// Action library providing named actions such as "Pulse"
    #[serde(default = "default_actions")]
    pub actions: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            path: default_resources_path(),
            scene: default_scene(),
            actions: default_actions(),
        }
    }
}

fn default_resources_path() -> PathBuf {
    PathBuf::from("./resources")
}

fn default_scene() -> String {
    "GameScene".to_string()
}

fn default_actions() -> String {
    "Actions".to_string()
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("tapfield.toml")).unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.resources.scene, "GameScene");
        assert_eq!(config.resources.path, PathBuf::from("./resources"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tapfield.toml");
        std::fs::write(&path, "[window]\ntitle = \"Demo\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.height, 768);
        assert_eq!(config.resources.actions, "Actions");
    }

    #[test]
    fn test_default_config_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tapfield.toml");
        save_default_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.window.title, "Tapfield");
        assert_eq!(config.resources.scene, "GameScene");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tapfield.toml");
        std::fs::write(&path, "[window\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
