//! Scan loop - periodically re-reads the game log and publishes new events
//!
//! One worker task per scan session owns the event store and counters. The
//! display side only sees [`ScanUpdate`] messages and talks back through
//! [`ScanCommand`]s.

mod config;
mod handle;
mod reader;
mod worker;

pub use config::{ScanConfig, StartError, StartRequest};
pub use handle::{start_scan, ScanControl, ScanHandle};
pub use reader::{read_log, ReadReport};
pub use worker::{ScanCommand, ScanState, ScanUpdate, TickReport};
