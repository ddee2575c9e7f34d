//! SC Kill Monitor - follows the Star Citizen game log and tracks the
//! kills and deaths of one player

pub mod cli;
pub mod event;
pub mod notification;
pub mod scan;
pub mod session;
pub mod settings;
pub mod tui;

pub use event::{format_kill_event, parse_line, KillEvent, LineError};
pub use notification::{Alert, AlertSink, ConsoleAlertSink, KillEventLog, MemoryAlertSink, Severity};
pub use scan::{
    start_scan, ScanCommand, ScanConfig, ScanControl, ScanHandle, ScanState, ScanUpdate,
    StartError, StartRequest, TickReport,
};
pub use session::{Counters, EventStore, Identity, SessionEvaluator};
pub use settings::{Channel, Settings, SettingsHandle, SettingsStore};
