//! Kill event model - parsing game log lines into structured events

mod formatter;
mod parser;
mod tokenizer;

pub use formatter::{format_kill_date, format_kill_event};
pub use parser::{is_marker_line, parse_line, parse_timestamp, LineError, ACTOR_DEATH_MARKER};
pub use tokenizer::extract;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single player death parsed from the game log
///
/// Equality is structural: two log lines yielding the same field values
/// are the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub killed_player: String,
    pub killer: String,
    pub weapon: String,
    pub weapon_class: String,
    pub damage_type: String,
    pub zone: String,
}

/// Name fragments that mark an actor as an NPC or system entity
const NON_PLAYER_MARKERS: [&str; 5] = ["unknown", "aimodule", "pu_", "npc_", "kopion_"];

impl KillEvent {
    /// Whether either side of the event is not a real player
    pub fn involves_non_player(&self) -> bool {
        is_non_player_name(&self.killer) || is_non_player_name(&self.killed_player)
    }

    /// Whether the monitored handle killed itself
    pub fn is_self_kill(&self) -> bool {
        self.killer == self.killed_player
    }
}

fn is_non_player_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    NON_PLAYER_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
pub(crate) fn sample_event(killed: &str, killer: &str, timestamp: &str) -> KillEvent {
    KillEvent {
        timestamp: DateTime::parse_from_rfc3339(timestamp).unwrap(),
        killed_player: killed.to_string(),
        killer: killer.to_string(),
        weapon: "Gun".to_string(),
        weapon_class: "Rifle".to_string(),
        damage_type: "Ballistic".to_string(),
        zone: "Stanton".to_string(),
    }
}
