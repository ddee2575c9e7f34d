//! User alerts - `(severity, header, message)` notifications

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// How serious an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    /// Short text with the main information
    pub header: String,
    /// What the user should do about it
    pub message: String,
}

impl Alert {
    pub fn new(severity: Severity, header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            header: header.into(),
            message: message.into(),
        }
    }

    pub fn error(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, header, message)
    }

    /// Raised when the monitored log cannot be read
    pub fn log_read_failed() -> Self {
        Self::error(
            "Failed to read log file",
            "Please check if the file exists and the path is set correctly.",
        )
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.header, self.message)
    }
}

/// Receiver of user-facing alerts
pub trait AlertSink: Send + Sync {
    /// Sink name for logs
    fn name(&self) -> &str;

    fn alert(&self, alert: &Alert);
}

/// Writes alerts to stderr and the log
pub struct ConsoleAlertSink;

impl AlertSink for ConsoleAlertSink {
    fn name(&self) -> &str {
        "console"
    }

    fn alert(&self, alert: &Alert) {
        log_alert(alert);
        eprintln!("{}", alert);
    }
}

/// Keeps alerts in memory for a UI to pick up
#[derive(Default)]
pub struct MemoryAlertSink {
    alerts: Mutex<Vec<Alert>>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts received so far
    pub fn alerts(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(alerts) => alerts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn latest(&self) -> Option<Alert> {
        self.alerts().pop()
    }

    pub fn len(&self) -> usize {
        self.alerts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for MemoryAlertSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn alert(&self, alert: &Alert) {
        log_alert(alert);
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert.clone()),
            Err(poisoned) => poisoned.into_inner().push(alert.clone()),
        }
    }
}

fn log_alert(alert: &Alert) {
    match alert.severity {
        Severity::Error => error!(header = %alert.header, "{}", alert.message),
        Severity::Warning => warn!(header = %alert.header, "{}", alert.message),
        Severity::Info => info!(header = %alert.header, "{}", alert.message),
    }
}
