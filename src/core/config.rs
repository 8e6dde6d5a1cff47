//! Handle configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default name of the per-directory image folder
pub const DEFAULT_IMAGE_FOLDER: &str = "_v_images";

/// Settings that shape where handles put their assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Image folder for notes and folder indexes, relative to the document's
    /// directory unless absolute
    pub image_folder: String,
    /// Image folder for orphan documents, relative to the document's
    /// directory unless absolute
    pub orphan_image_folder: String,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            image_folder: DEFAULT_IMAGE_FOLDER.to_string(),
            orphan_image_folder: DEFAULT_IMAGE_FOLDER.to_string(),
        }
    }
}

impl HandleConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "notefile", "Notefile")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user's config directory
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the user's config directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to save config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HandleConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, HandleConfig::default());
        assert_eq!(config.image_folder, "_v_images");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = HandleConfig {
            image_folder: "assets".to_string(),
            orphan_image_folder: "/shared/images".to_string(),
        };

        config.save_to(&path).unwrap();
        assert_eq!(HandleConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "image_folder": "pics" }"#).unwrap();

        let config = HandleConfig::load_from(&path).unwrap();
        assert_eq!(config.image_folder, "pics");
        assert_eq!(config.orphan_image_folder, DEFAULT_IMAGE_FOLDER);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(HandleConfig::load_from(&path).is_err());
    }
}
