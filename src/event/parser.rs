//! Kill line parser - turns `<Actor Death>` log lines into [`KillEvent`]s

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::fmt;

use super::tokenizer::extract;
use super::KillEvent;

/// Literal marker carried by every player death line
pub const ACTOR_DEATH_MARKER: &str = "<Actor Death>";

const KILLED_PLAYER_TOKENS: (&str, &str) = ("CActor::Kill: '", "'");
const ZONE_TOKENS: (&str, &str) = ("in zone '", "'");
const KILLER_TOKENS: (&str, &str) = ("killed by '", "'");
const WEAPON_TOKENS: (&str, &str) = ("using '", "'");
const WEAPON_CLASS_TOKENS: (&str, &str) = ("[Class ", "]");
const DAMAGE_TYPE_TOKENS: (&str, &str) = ("with damage type '", "'");

/// Why a candidate line could not become an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// No `<...>` timestamp section at the start of the line
    MissingTimestamp,
    /// The timestamp section is not an ISO-8601 date-time with offset
    InvalidTimestamp(String),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::MissingTimestamp => write!(f, "no timestamp section found"),
            LineError::InvalidTimestamp(raw) => write!(f, "invalid timestamp '{}'", raw),
        }
    }
}

impl std::error::Error for LineError {}

/// Whether the line is eligible for parsing at all
pub fn is_marker_line(line: &str) -> bool {
    line.contains(ACTOR_DEATH_MARKER)
}

/// Parse one log line
///
/// Returns `Ok(None)` for lines without the death marker; those are never
/// inspected further. Empty fields are legal, only the timestamp can make a
/// candidate line invalid.
pub fn parse_line(line: &str) -> Result<Option<KillEvent>, LineError> {
    if !is_marker_line(line) {
        return Ok(None);
    }

    let timestamp = parse_timestamp(timestamp_section(line)?)?;

    Ok(Some(KillEvent {
        timestamp,
        killed_player: field(line, KILLED_PLAYER_TOKENS),
        killer: field(line, KILLER_TOKENS),
        weapon: field(line, WEAPON_TOKENS),
        weapon_class: field(line, WEAPON_CLASS_TOKENS),
        damage_type: field(line, DAMAGE_TYPE_TOKENS),
        zone: field(line, ZONE_TOKENS),
    }))
}

fn field(line: &str, (start, end): (&str, &str)) -> String {
    extract(line, start, end).to_string()
}

/// Text between the first `<` and the first `>` of the line
fn timestamp_section(line: &str) -> Result<&str, LineError> {
    let start = line.find('<').ok_or(LineError::MissingTimestamp)?;
    let end = line.find('>').ok_or(LineError::MissingTimestamp)?;
    if end <= start {
        return Err(LineError::MissingTimestamp);
    }
    Ok(&line[start + 1..end])
}

/// Parse an ISO-8601 date-time carrying an offset
///
/// Accepts RFC 3339 (`2025-01-01T10:00:00.123Z`), a trailing region id in
/// brackets (`...+01:00[Europe/Berlin]`) and times without seconds.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, LineError> {
    let trimmed = raw.trim();
    let without_region = match trimmed.find('[') {
        Some(index) if trimmed.ends_with(']') => &trimmed[..index],
        _ => trimmed,
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(without_region) {
        return Ok(timestamp);
    }

    let normalized = match without_region.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => without_region.to_string(),
    };

    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(timestamp) = DateTime::parse_from_str(&normalized, format) {
            return Ok(timestamp);
        }
    }

    // Offset without colon, e.g. +0100
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"] {
        if let Ok(timestamp) = DateTime::parse_from_str(&normalized, format) {
            return Ok(timestamp);
        }
    }

    // A bare local date-time has no zone, which the log never omits
    if NaiveDateTime::parse_from_str(without_region, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
        return Err(LineError::InvalidTimestamp(format!("{} (no offset)", raw)));
    }

    Err(LineError::InvalidTimestamp(raw.to_string()))
}
