//! Output formatting for CLI commands

use serde::Serialize;

use crate::event::{format_kill_event, KillEvent};
use crate::session::Counters;

/// Format output as pretty JSON
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// One-line counter summary; kills only exist in killer mode
pub fn counters_line(counters: &Counters, killer_mode: bool) -> String {
    if killer_mode {
        format!("Kills: {} | Deaths: {}", counters.kills, counters.deaths)
    } else {
        format!("Deaths: {}", counters.deaths)
    }
}

/// Human-readable block, or a single JSON line with `json`
pub fn event_output(event: &KillEvent, json: bool) -> String {
    if json {
        serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
    } else {
        format!("{}\n", format_kill_event(event))
    }
}
