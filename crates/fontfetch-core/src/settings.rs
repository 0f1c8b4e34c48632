//! Persistent user settings (the Google Fonts API key)
//!
//! Settings live in a small JSON document:
//!
//! ```json
//! { "google": { "enabled": true, "api_key": "" } }
//! ```
//!
//! The file is created with defaults on first run and rewritten atomically
//! whenever the key changes.

use crate::{FontError, FontResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the Google Fonts catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleSettings {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
        }
    }
}

/// On-disk settings document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub google: GoogleSettings,
}

impl Settings {
    /// Credentials for the primary catalog, if a non-empty key is stored
    pub fn credentials(&self) -> Option<CatalogCredentials> {
        let key = self.google.api_key.trim();
        if key.is_empty() {
            None
        } else {
            Some(CatalogCredentials::new(key))
        }
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.google.api_key = key.into();
    }

    pub fn google_enabled(&self) -> bool {
        self.google.enabled
    }
}

/// API key handed to the primary catalog client
#[derive(Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
    api_key: String,
}

impl CatalogCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for CatalogCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCredentials")
            .field("api_key", &"***")
            .finish()
    }
}

/// Get the settings file path
pub fn settings_path() -> PathBuf {
    if let Ok(override_path) = std::env::var("FONTFETCH_CONFIG") {
        return PathBuf::from(override_path);
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fontfetch")
        .join("config.json")
}

/// Load settings from `path`, writing a default document first if it is missing
pub fn load_or_create(path: &Path) -> FontResult<Settings> {
    if !path.exists() {
        log::info!("Creating default settings at {}", path.display());
        let settings = Settings::default();
        save(path, &settings)?;
        return Ok(settings);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| FontError::Settings(format!("Failed to read settings: {e}"), path.to_path_buf()))?;

    serde_json::from_str(&content)
        .map_err(|e| FontError::Settings(format!("Failed to parse settings: {e}"), path.to_path_buf()))
}

/// Save settings to `path` (atomic write)
pub fn save(path: &Path, settings: &Settings) -> FontResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FontError::Settings(format!("Failed to create settings directory: {e}"), path.to_path_buf())
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| FontError::Settings(format!("Failed to serialize settings: {e}"), path.to_path_buf()))?;

    fs::write(&temp_path, content + "\n").map_err(|e| {
        FontError::Settings(format!("Failed to write settings temp file: {e}"), path.to_path_buf())
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        FontError::Settings(format!("Failed to rename settings file: {e}"), path.to_path_buf())
    })?;

    Ok(())
}
