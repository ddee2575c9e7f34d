//! Settings - user configuration, its file store and change notification

mod handle;
mod store;

pub use handle::{SettingsHandle, SubscriptionId};
pub use store::SettingsStore;

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const KEY_PATH_LIVE: &str = "path_live";
pub const KEY_PATH_PTU: &str = "path_ptu";
pub const KEY_PATH_EPTU: &str = "path_eptu";
pub const KEY_PATH_HOTFIX: &str = "path_hotfix";
pub const KEY_PATH_TECH_PREVIEW: &str = "path_tech_preview";
pub const KEY_PATH_CUSTOM: &str = "path_custom";
pub const KEY_PLAYER_HANDLE: &str = "player_handle";
pub const KEY_INTERVAL_SECONDS: &str = "interval_seconds";
pub const KEY_SHOW_ALL: &str = "show_all";
pub const KEY_WRITE_TO_FILE: &str = "write_to_file";
pub const KEY_KILLER_MODE_ACTIVE: &str = "killer_mode_active";
pub const KEY_SELECTED_CHANNEL: &str = "selected_channel";

/// Every key accepted by [`Settings::get_value`] and [`Settings::set_value`]
pub const ALL_KEYS: [&str; 12] = [
    KEY_PATH_LIVE,
    KEY_PATH_PTU,
    KEY_PATH_EPTU,
    KEY_PATH_HOTFIX,
    KEY_PATH_TECH_PREVIEW,
    KEY_PATH_CUSTOM,
    KEY_PLAYER_HANDLE,
    KEY_INTERVAL_SECONDS,
    KEY_SHOW_ALL,
    KEY_WRITE_TO_FILE,
    KEY_KILLER_MODE_ACTIVE,
    KEY_SELECTED_CHANNEL,
];

pub const DEFAULT_INTERVAL_SECONDS: u64 = 60;

/// Game build whose log is monitored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    #[default]
    Live,
    Ptu,
    Eptu,
    Hotfix,
    TechPreview,
    Custom,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Live,
        Channel::Ptu,
        Channel::Eptu,
        Channel::Hotfix,
        Channel::TechPreview,
        Channel::Custom,
    ];

    /// Name shown to the user, also the install folder name
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Live => "LIVE",
            Channel::Ptu => "PTU",
            Channel::Eptu => "EPTU",
            Channel::Hotfix => "HOTFIX",
            Channel::TechPreview => "TECH-PREVIEW",
            Channel::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "LIVE" => Ok(Channel::Live),
            "PTU" => Ok(Channel::Ptu),
            "EPTU" => Ok(Channel::Eptu),
            "HOTFIX" => Ok(Channel::Hotfix),
            "TECH_PREVIEW" => Ok(Channel::TechPreview),
            "CUSTOM" => Ok(Channel::Custom),
            _ => Err(anyhow!("unknown channel '{}'", s)),
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub path_live: String,
    pub path_ptu: String,
    pub path_eptu: String,
    pub path_hotfix: String,
    pub path_tech_preview: String,
    pub path_custom: String,
    pub player_handle: String,
    pub interval_seconds: u64,
    pub show_all: bool,
    pub write_to_file: bool,
    pub killer_mode_active: bool,
    pub selected_channel: Channel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path_live: default_log_path(Channel::Live),
            path_ptu: default_log_path(Channel::Ptu),
            path_eptu: default_log_path(Channel::Eptu),
            path_hotfix: default_log_path(Channel::Hotfix),
            path_tech_preview: default_log_path(Channel::TechPreview),
            path_custom: String::new(),
            player_handle: String::new(),
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            show_all: false,
            write_to_file: false,
            killer_mode_active: false,
            selected_channel: Channel::Live,
        }
    }
}

impl Settings {
    /// Log file configured for a channel
    pub fn path_for(&self, channel: Channel) -> &str {
        match channel {
            Channel::Live => &self.path_live,
            Channel::Ptu => &self.path_ptu,
            Channel::Eptu => &self.path_eptu,
            Channel::Hotfix => &self.path_hotfix,
            Channel::TechPreview => &self.path_tech_preview,
            Channel::Custom => &self.path_custom,
        }
    }

    pub fn path_for_mut(&mut self, channel: Channel) -> &mut String {
        match channel {
            Channel::Live => &mut self.path_live,
            Channel::Ptu => &mut self.path_ptu,
            Channel::Eptu => &mut self.path_eptu,
            Channel::Hotfix => &mut self.path_hotfix,
            Channel::TechPreview => &mut self.path_tech_preview,
            Channel::Custom => &mut self.path_custom,
        }
    }

    /// Log file of the selected channel
    pub fn selected_path(&self) -> &str {
        self.path_for(self.selected_channel)
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            KEY_PATH_LIVE => self.path_live.clone(),
            KEY_PATH_PTU => self.path_ptu.clone(),
            KEY_PATH_EPTU => self.path_eptu.clone(),
            KEY_PATH_HOTFIX => self.path_hotfix.clone(),
            KEY_PATH_TECH_PREVIEW => self.path_tech_preview.clone(),
            KEY_PATH_CUSTOM => self.path_custom.clone(),
            KEY_PLAYER_HANDLE => self.player_handle.clone(),
            KEY_INTERVAL_SECONDS => self.interval_seconds.to_string(),
            KEY_SHOW_ALL => self.show_all.to_string(),
            KEY_WRITE_TO_FILE => self.write_to_file.to_string(),
            KEY_KILLER_MODE_ACTIVE => self.killer_mode_active.to_string(),
            KEY_SELECTED_CHANNEL => self.selected_channel.label().to_string(),
            _ => bail!("unknown setting '{}'", key),
        };
        Ok(value)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            KEY_PATH_LIVE => self.path_live = value.to_string(),
            KEY_PATH_PTU => self.path_ptu = value.to_string(),
            KEY_PATH_EPTU => self.path_eptu = value.to_string(),
            KEY_PATH_HOTFIX => self.path_hotfix = value.to_string(),
            KEY_PATH_TECH_PREVIEW => self.path_tech_preview = value.to_string(),
            KEY_PATH_CUSTOM => self.path_custom = value.to_string(),
            KEY_PLAYER_HANDLE => self.player_handle = value.trim().to_string(),
            KEY_INTERVAL_SECONDS => {
                let interval: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("'{}' is not a valid interval", value))?;
                if interval == 0 {
                    bail!("interval must be at least 1 second");
                }
                self.interval_seconds = interval;
            }
            KEY_SHOW_ALL => self.show_all = parse_bool(value)?,
            KEY_WRITE_TO_FILE => self.write_to_file = parse_bool(value)?,
            KEY_KILLER_MODE_ACTIVE => self.killer_mode_active = parse_bool(value)?,
            KEY_SELECTED_CHANNEL => self.selected_channel = value.parse()?,
            _ => bail!("unknown setting '{}'", key),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("'{}' is not a boolean", value)),
    }
}

/// Default `Game.log` location of a channel's install
pub fn default_log_path(channel: Channel) -> String {
    if channel == Channel::Custom {
        return String::new();
    }
    install_root()
        .join(channel.label())
        .join("Game.log")
        .to_string_lossy()
        .into_owned()
}

#[cfg(windows)]
fn install_root() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Roberts Space Industries\StarCitizen")
}

#[cfg(not(windows))]
fn install_root() -> PathBuf {
    // Default Wine prefix layout used by the Linux community launcher
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Games")
        .join("star-citizen")
        .join("drive_c")
        .join("Program Files")
        .join("Roberts Space Industries")
        .join("StarCitizen")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.interval_seconds, 60);
        assert_eq!(settings.player_handle, "");
        assert_eq!(settings.path_custom, "");
        assert!(!settings.show_all && !settings.write_to_file && !settings.killer_mode_active);
        assert!(settings.path_live.ends_with("Game.log"));
        assert!(settings.path_ptu.contains("PTU"));
        assert!(settings.path_tech_preview.contains("TECH-PREVIEW"));
    }

    #[test]
    fn test_selected_path_follows_channel() {
        let mut settings = Settings::default();
        settings.path_custom = "/tmp/custom.log".to_string();
        settings.selected_channel = Channel::Custom;
        assert_eq!(settings.selected_path(), "/tmp/custom.log");
    }

    #[test]
    fn test_set_and_get_values() {
        let mut settings = Settings::default();
        settings.set_value(KEY_PLAYER_HANDLE, " Pilot1 ").unwrap();
        settings.set_value(KEY_INTERVAL_SECONDS, "5").unwrap();
        settings.set_value(KEY_KILLER_MODE_ACTIVE, "yes").unwrap();
        settings.set_value(KEY_SELECTED_CHANNEL, "tech-preview").unwrap();

        assert_eq!(settings.get_value(KEY_PLAYER_HANDLE).unwrap(), "Pilot1");
        assert_eq!(settings.get_value(KEY_INTERVAL_SECONDS).unwrap(), "5");
        assert_eq!(settings.get_value(KEY_KILLER_MODE_ACTIVE).unwrap(), "true");
        assert_eq!(settings.selected_channel, Channel::TechPreview);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set_value(KEY_INTERVAL_SECONDS, "soon").is_err());
        assert!(settings.set_value(KEY_INTERVAL_SECONDS, "0").is_err());
        assert!(settings.set_value(KEY_SHOW_ALL, "maybe").is_err());
        assert!(settings.set_value("volume", "11").is_err());
        assert_eq!(settings.interval_seconds, 60);
    }

    #[test]
    fn test_every_key_is_readable() {
        let settings = Settings::default();
        for key in ALL_KEYS {
            assert!(settings.get_value(key).is_ok(), "{key}");
        }
    }

    #[test]
    fn test_channel_parsing() {
        for channel in Channel::ALL {
            assert_eq!(channel.label().parse::<Channel>().unwrap(), channel);
        }
        assert!("nightly".parse::<Channel>().is_err());
    }
}
