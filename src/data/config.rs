//! Application Configuration
//!
//! Handles loading and saving the settings file. The file is a single JSON
//! record in the per-user config directory; a missing or unreadable file is
//! never an error, it just means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default global hotkey, a four-modifier combination unlikely to collide
/// with anything the user already has bound.
pub const DEFAULT_HOTKEY: &str = "Shift+Control+Option+Command+O";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    #[serde(default = "default_true", rename = "soundEnabled")]
    pub sound_enabled: bool,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            sound_enabled: true,
        }
    }
}

/// Reads and writes the settings file.
///
/// Saves overwrite the file wholesale; there are no partial updates and no
/// versioning.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by the default per-user settings file.
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Store backed by an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the settings file path
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("spellbar").join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load configuration, falling back to defaults on a missing file,
    /// unreadable file, or malformed JSON. Never fails.
    pub fn load(&self) -> AppConfig {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("Settings file not readable, using defaults: {}", err);
                return AppConfig::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Settings file is malformed, using defaults: {}", err);
                AppConfig::default()
            }
        }
    }

    /// Save configuration, overwriting the whole file.
    pub fn save(&self, config: &AppConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Save without waiting for the write to finish. Failures are logged,
    /// not surfaced; responsiveness is preferred over a persistence
    /// guarantee here.
    pub fn save_in_background(&self, config: AppConfig) {
        let store = self.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if let Err(err) = store.save(&config) {
                        tracing::warn!("Failed to save settings: {}", err);
                    }
                });
            }
            Err(_) => {
                // No runtime (e.g. unit tests); write inline.
                if let Err(err) = store.save(&config) {
                    tracing::warn!("Failed to save settings: {}", err);
                }
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
