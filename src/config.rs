//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Content library settings
    pub library: LibraryConfig,
    /// Cloud key-value proxy settings
    pub cloud: CloudConfig,
    /// Confirmation settings
    pub confirmations: ConfirmConfig,
    /// Remembered panel geometry
    pub panel: PanelConfig,
}

/// Settings for the bundled content library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Base URL of the content directory
    pub base_url: String,
    /// Manifest filename within the content directory
    pub manifest: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/content".to_string(),
            manifest: "manifest.json".to_string(),
        }
    }
}

/// Settings for the cloud key-value REST proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Base URL of the proxy (the proxy handles upstream authentication)
    pub base_url: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787/kv".to_string(),
        }
    }
}

/// Confirmation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Ask before deleting a document
    pub confirm_delete: bool,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            confirm_delete: true,
        }
    }
}

/// Panel geometry remembered across runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Remember position/collapsed/tab across runs
    pub remember_geometry: bool,
    #[serde(default)]
    pub last_x: Option<u16>,
    #[serde(default)]
    pub last_y: Option<u16>,
    #[serde(default)]
    pub last_collapsed: bool,
    /// "local", "library" or "cloud"
    #[serde(default)]
    pub last_tab: Option<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            remember_geometry: true,
            last_x: None,
            last_y: None,
            last_collapsed: false,
            last_tab: None,
        }
    }
}

/// Get the configuration directory
pub fn config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|p| PathBuf::from(p).join(".config"))
        })
        .map(|p| p.join("satchel"))
}

/// Get the config file path
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Get the durable folder-capability store path
pub fn store_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("handles.toml"))
}

/// Default config file contents, written on first run
fn default_config() -> String {
    r##"# satchel configuration

[library]
# Base URL of the bundled content directory
base_url = "http://localhost:8080/content"
# Manifest filename inside the content directory
manifest = "manifest.json"

[cloud]
# Base URL of the key-value REST proxy
base_url = "http://localhost:8787/kv"

[confirmations]
# Ask before deleting a document
confirm_delete = true

[panel]
# Remember panel position, collapse state and active tab across runs
remember_geometry = true
"##
    .to_string()
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Self {
        let Some(config_path) = config_file() else {
            eprintln!("Warning: Could not determine config directory");
            return Config::default();
        };

        if let Some(dir) = config_path.parent()
            && !dir.exists()
            && let Err(e) = fs::create_dir_all(dir)
        {
            eprintln!("Warning: Could not create config directory: {}", e);
            return Config::default();
        }

        if !config_path.exists()
            && let Err(e) = fs::write(&config_path, default_config())
        {
            eprintln!("Warning: Could not create config file: {}", e);
            return Config::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml_edit::de::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Could not parse config file: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Could not read config file: {}", e);
                Config::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = config_file().ok_or("Could not determine config path")?;
        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&config_path, toml_edit::ser::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml_edit::de::from_str(&default_config()).unwrap();
        assert_eq!(config.library.manifest, "manifest.json");
        assert!(config.confirmations.confirm_delete);
        assert!(config.panel.remember_geometry);
        assert_eq!(config.panel.last_x, None);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml_edit::de::from_str("[cloud]\nbase_url = \"http://kv\"\n").unwrap();
        assert_eq!(config.cloud.base_url, "http://kv");
        assert_eq!(config.library.base_url, "http://localhost:8080/content");
    }
}
