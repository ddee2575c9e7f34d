//! Scan start validation

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::notification::{Alert, DEFAULT_KILL_LOG_DIR};
use crate::session::Identity;
use crate::settings::{Channel, Settings};

/// Raw user input for starting a scan, validated by [`StartRequest::validate`]
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub handle: String,
    /// Kept as text so a non-numeric entry can be reported
    pub interval: String,
    pub channel: Channel,
    pub path: String,
    pub show_all: bool,
    pub killer_mode: bool,
    pub write_to_file: bool,
    pub kill_log_dir: PathBuf,
}

impl StartRequest {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            handle: settings.player_handle.clone(),
            interval: settings.interval_seconds.to_string(),
            channel: settings.selected_channel,
            path: settings.selected_path().to_string(),
            show_all: settings.show_all,
            killer_mode: settings.killer_mode_active,
            write_to_file: settings.write_to_file,
            kill_log_dir: PathBuf::from(DEFAULT_KILL_LOG_DIR),
        }
    }

    /// Check the required inputs in the order a user would fill them in
    pub fn validate(self) -> Result<ScanConfig, StartError> {
        if self.handle.is_empty() {
            return Err(StartError::EmptyHandle);
        }
        if self.interval.trim().is_empty() {
            return Err(StartError::EmptyInterval);
        }
        if self.path.is_empty() {
            return Err(StartError::EmptyPath);
        }

        let seconds: u64 = self
            .interval
            .trim()
            .parse()
            .map_err(|_| StartError::InvalidInterval(self.interval.clone()))?;
        if seconds == 0 {
            return Err(StartError::InvalidInterval(self.interval));
        }

        Ok(ScanConfig {
            identity: Identity::new(self.handle, self.killer_mode),
            channel: self.channel,
            log_path: PathBuf::from(self.path),
            interval: Duration::from_secs(seconds),
            show_all: self.show_all,
            write_to_file: self.write_to_file,
            kill_log_dir: self.kill_log_dir,
        })
    }
}

/// Configuration error that prevents a scan from starting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    EmptyHandle,
    EmptyInterval,
    EmptyPath,
    InvalidInterval(String),
}

impl StartError {
    /// User-facing alert for this error
    pub fn alert(&self) -> Alert {
        match self {
            StartError::EmptyHandle => Alert::error("Handle is empty", "Please enter a handle"),
            StartError::EmptyInterval => {
                Alert::error("Interval is empty", "Please enter an interval")
            }
            StartError::EmptyPath => Alert::error("Path is empty", "Please select a path"),
            StartError::InvalidInterval(_) => {
                Alert::error("Interval is invalid", "Please enter a valid interval")
            }
        }
    }
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::EmptyHandle => write!(f, "handle is empty"),
            StartError::EmptyInterval => write!(f, "interval is empty"),
            StartError::EmptyPath => write!(f, "log file path is empty"),
            StartError::InvalidInterval(raw) => write!(f, "interval '{}' is invalid", raw),
        }
    }
}

impl std::error::Error for StartError {}

/// Validated settings of one scan session
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub identity: Identity,
    pub channel: Channel,
    pub log_path: PathBuf,
    pub interval: Duration,
    pub show_all: bool,
    pub write_to_file: bool,
    /// Directory receiving `kill-events_<suffix>.log`
    pub kill_log_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StartRequest {
        StartRequest {
            handle: "Pilot1".to_string(),
            interval: "5".to_string(),
            channel: Channel::Live,
            path: "/tmp/Game.log".to_string(),
            show_all: false,
            killer_mode: true,
            write_to_file: false,
            kill_log_dir: PathBuf::from("logs"),
        }
    }

    #[test]
    fn test_valid_request() {
        let config = request().validate().unwrap();
        assert_eq!(config.identity, Identity::new("Pilot1", true));
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.log_path, PathBuf::from("/tmp/Game.log"));
    }

    #[test]
    fn test_empty_inputs() {
        let mut r = request();
        r.handle.clear();
        assert_eq!(r.validate().unwrap_err(), StartError::EmptyHandle);

        let mut r = request();
        r.interval = " ".to_string();
        assert_eq!(r.validate().unwrap_err(), StartError::EmptyInterval);

        let mut r = request();
        r.path.clear();
        assert_eq!(r.validate().unwrap_err(), StartError::EmptyPath);
    }

    #[test]
    fn test_invalid_interval() {
        for raw in ["abc", "1.5", "-3", "0"] {
            let mut r = request();
            r.interval = raw.to_string();
            let error = r.validate().unwrap_err();
            assert!(matches!(error, StartError::InvalidInterval(_)), "{raw}");
            assert_eq!(error.alert().header, "Interval is invalid");
        }
    }

    #[test]
    fn test_handle_checked_before_interval() {
        let mut r = request();
        r.handle.clear();
        r.interval = "abc".to_string();
        assert_eq!(r.validate().unwrap_err(), StartError::EmptyHandle);
    }

    #[test]
    fn test_from_settings_uses_selected_channel_path() {
        let mut settings = Settings::default();
        settings.player_handle = "Pilot1".to_string();
        settings.selected_channel = Channel::Custom;
        settings.path_custom = "/data/Game.log".to_string();

        let r = StartRequest::from_settings(&settings);
        assert_eq!(r.path, "/data/Game.log");
        assert_eq!(r.interval, "60");
        assert_eq!(r.channel, Channel::Custom);
    }
}
