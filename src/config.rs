// src/config.rs

//! Persisted user settings
//!
//! A small TOML file under the per-user configuration directory holding
//! the preferred display language. Read at startup, written on change; a
//! missing file is not an error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Settings persisted across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred display language code (en, zh, zh-TW, ja, ko)
    pub language: Option<String>,
}

impl Settings {
    /// Location of the settings file, if a config directory exists.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("apkpatcher").join("config.toml"))
    }

    /// Load settings from the per-user configuration file.
    ///
    /// Returns defaults when the file (or the config directory itself)
    /// does not exist.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings =
            toml::from_str(&content).map_err(|e| Error::Settings(e.to_string()))?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Persist the settings, creating the directory as needed.
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::path() else {
            return Err(Error::Settings(
                "no configuration directory on this system".to_string(),
            ));
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string(self).map_err(|e| Error::Settings(e.to_string()))?;
        fs::write(&path, content)?;
        debug!("saved settings to {}", path.display());
        Ok(())
    }
}

/// Detect the system language from the usual environment variables.
///
/// Encoding and region suffixes are stripped ("zh_CN.UTF-8" becomes
/// "zh"); an unset environment falls back to "en".
pub fn system_language() -> String {
    let lang = ["LANG", "LC_ALL", "LC_MESSAGES", "LANGUAGE"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()));

    match lang {
        Some(value) => normalize_language(&value),
        None => "en".to_string(),
    }
}

fn normalize_language(value: &str) -> String {
    let value = value.split('.').next().unwrap_or(value);
    let value = value.split('_').next().unwrap_or(value);
    if value.is_empty() {
        "en".to_string()
    } else {
        value.to_string()
    }
}
