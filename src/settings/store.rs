//! Settings store - JSON file under the user config directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::Settings;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/sc-kill-monitor/settings.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sc-kill-monitor")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored settings; `Ok(None)` if nothing was saved yet
    pub fn try_load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(settings))
    }

    /// Load settings, falling back to defaults for anything unreadable
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => {
                debug!(path = %self.path.display(), "Loaded settings");
                settings
            }
            Ok(None) => Settings::default(),
            Err(e) => {
                error!(error = %format!("{:#}", e), "Couldn't load the settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Write settings atomically (temp file + rename)
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(settings)?)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    /// Save and only log a failure; the in-memory settings stay as they are
    pub fn save_or_log(&self, settings: &Settings) -> bool {
        match self.save(settings) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %format!("{:#}", e), "Couldn't persist the settings");
                false
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
