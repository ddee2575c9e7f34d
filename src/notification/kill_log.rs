//! Kill event log - per-session append-only file of serialized events
//!
//! File layout: `<dir>/kill-events_<yyMMdd-HHmmss>.log`, records written as
//! pretty JSON objects separated by `,\n` with no enclosing array. The file
//! is never locked.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::event::KillEvent;

pub const DEFAULT_KILL_LOG_DIR: &str = "logs";

/// File name suffix derived from the scan start time
pub fn session_suffix<Tz: TimeZone>(scan_start: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    scan_start.format("%y%m%d-%H%M%S").to_string()
}

/// Append-only log of the events of one scan session
#[derive(Debug, Clone)]
pub struct KillEventLog {
    path: PathBuf,
}

impl KillEventLog {
    pub fn new(dir: impl AsRef<Path>, suffix: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("kill-events_{}.log", suffix)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event; the file is opened and closed for every write
    ///
    /// No lock is taken so readers can follow the file while a scan runs.
    /// Separator and record go out in a single append.
    pub fn append(&self, event: &KillEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut record = Vec::new();
        if file.metadata()?.len() > 0 {
            record.extend_from_slice(b",\n");
        }
        record.extend_from_slice(serde_json::to_string_pretty(event)?.as_bytes());
        file.write_all(&record)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        file.flush()?;

        debug!(path = %self.path.display(), "Kill event written to file");
        Ok(())
    }

    /// Append and only log a failure
    pub fn append_or_log(&self, event: &KillEvent) -> bool {
        match self.append(event) {
            Ok(()) => {
                info!(path = %self.path.display(), "Kill event successfully written to file");
                true
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %format!("{:#}", e),
                    "Error while writing kill event to file"
                );
                false
            }
        }
    }
}

/// Read a kill event log back by wrapping its records in an array
pub fn read_kill_log(path: &Path) -> Result<Vec<KillEvent>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let events = serde_json::from_str(&format!("[{}]", content))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(events)
}
