//! Output sinks - user alerts and the per-session kill event log
//!
//! Alerts go through the `AlertSink` trait so the scan loop never knows
//! whether it talks to a console, the dashboard or a test recorder.

pub mod alert;
pub mod kill_log;

pub use alert::{Alert, AlertSink, ConsoleAlertSink, MemoryAlertSink, Severity};
pub use kill_log::{read_kill_log, session_suffix, KillEventLog, DEFAULT_KILL_LOG_DIR};
