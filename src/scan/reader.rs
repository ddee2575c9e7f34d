//! Full-file log reader

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use crate::event::{parse_line, KillEvent};

/// Lines between two cancellation checks
const CANCEL_CHECK_LINES: usize = 1024;

/// Result of reading the whole log once
#[derive(Debug, Default)]
pub struct ReadReport {
    /// Parsed events in file order
    pub events: Vec<KillEvent>,
    pub total_lines: usize,
    pub malformed_lines: usize,
}

/// Read `path` from the beginning and parse every marker line
///
/// Malformed marker lines are logged and skipped. Returns `Ok(None)` when
/// `cancel` was raised before the end of the file. Invalid UTF-8 is
/// replaced rather than failing the read.
pub fn read_log(path: &Path, cancel: &AtomicBool) -> io::Result<Option<ReadReport>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut report = ReadReport::default();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        report.total_lines += 1;

        if report.total_lines % CANCEL_CHECK_LINES == 0 && cancel.load(Ordering::Relaxed) {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&buffer);
        let line = text.trim_end_matches(['\r', '\n']);
        match parse_line(line) {
            Ok(Some(event)) => report.events.push(event),
            Ok(None) => {}
            Err(e) => {
                report.malformed_lines += 1;
                warn!(error = %e, line = %line, "Failed to parse log line");
            }
        }
    }

    Ok(Some(report))
}
