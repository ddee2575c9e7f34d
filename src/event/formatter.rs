use chrono::{DateTime, FixedOffset};

use super::KillEvent;

/// `dd.MM.yy HH:mm:ss.SSS UTC`
pub fn format_kill_date(timestamp: &DateTime<FixedOffset>) -> String {
    format!("{} UTC", timestamp.format("%d.%m.%y %H:%M:%S%.3f"))
}

/// Labelled multi-line block shown for every displayed event
pub fn format_kill_event(event: &KillEvent) -> String {
    format!(
        "Kill Date = {}\n\
         Killed Player = {}\n\
         Zone = {}\n\
         Killer = {}\n\
         Used Method/Weapon = {}\n\
         Class = {}\n\
         Damage Type = {}",
        format_kill_date(&event.timestamp),
        event.killed_player,
        event.zone,
        event.killer,
        event.weapon,
        event.weapon_class,
        event.damage_type,
    )
}
