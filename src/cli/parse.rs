//! Parse command - one-shot evaluation of a log file

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use super::output::{counters_line, event_output, format_output};
use crate::event::KillEvent;
use crate::scan::read_log;
use crate::session::{Counters, EventStore, Identity, SessionEvaluator};

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Log file to read
    pub path: PathBuf,

    /// Only keep events involving this handle and count them
    #[arg(long)]
    pub handle: Option<String>,

    /// Count kills made by the handle
    #[arg(long)]
    pub killer_mode: bool,

    /// Also show events involving NPCs
    #[arg(long)]
    pub show_all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a one-shot parse
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub total_lines: usize,
    pub malformed_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<Counters>,
    pub events: Vec<KillEvent>,
}

pub fn parse_log_file(args: &ParseArgs) -> Result<ParseSummary> {
    let report = read_log(&args.path, &AtomicBool::new(false))
        .with_context(|| format!("failed to read {}", args.path.display()))?
        .unwrap_or_default();

    let (events, counters) = match &args.handle {
        Some(handle) => {
            let identity = Identity::new(handle.clone(), args.killer_mode);
            let mut store = EventStore::new();
            store.ingest(report.events, &identity);
            let mut evaluator = SessionEvaluator::new(identity, args.show_all);
            let displayed = evaluator.evaluate(&store);
            (displayed, Some(evaluator.counters()))
        }
        None => {
            let mut events = report.events;
            if !args.show_all {
                events.retain(|event| !event.involves_non_player());
            }
            // Newest first; among equal timestamps the later line wins
            events.reverse();
            events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            (events, None)
        }
    };

    Ok(ParseSummary {
        total_lines: report.total_lines,
        malformed_lines: report.malformed_lines,
        counters,
        events,
    })
}

pub fn handle_parse(args: ParseArgs) -> Result<()> {
    let summary = parse_log_file(&args)?;

    if args.json {
        println!("{}", format_output(&summary));
        return Ok(());
    }

    for event in &summary.events {
        println!("{}", event_output(event, false));
    }
    println!(
        "{} events, {} lines, {} malformed",
        summary.events.len(),
        summary.total_lines,
        summary.malformed_lines
    );
    if let Some(counters) = &summary.counters {
        println!("{}", counters_line(counters, args.killer_mode));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn line(ts: &str, killed: &str, killer: &str) -> String {
        format!("<{ts}> <Actor Death> CActor::Kill: '{killed}' in zone 'Stanton' killed by '{killer}' using 'Gun' [Class Rifle] with damage type 'Bullet'")
    }

    fn args(file: &NamedTempFile) -> ParseArgs {
        ParseArgs {
            path: file.path().to_path_buf(),
            handle: None,
            killer_mode: false,
            show_all: false,
            json: false,
        }
    }

    fn log_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2")).unwrap();
        writeln!(file, "{}", line("2025-01-01T12:00:00Z", "Pilot3", "Pilot1")).unwrap();
        writeln!(file, "{}", line("2025-01-01T11:00:00Z", "Pilot1", "NPC_Guard")).unwrap();
        writeln!(file, "<garbage> <Actor Death>").unwrap();
        file
    }

    #[test]
    fn test_without_handle_lists_player_events_newest_first() {
        let file = log_file();
        let summary = parse_log_file(&args(&file)).unwrap();

        assert_eq!(summary.total_lines, 4);
        assert_eq!(summary.malformed_lines, 1);
        assert!(summary.counters.is_none());
        let killers: Vec<&str> = summary.events.iter().map(|e| e.killer.as_str()).collect();
        assert_eq!(killers, vec!["Pilot1", "Pilot2"]);
    }

    #[test]
    fn test_with_handle_counts() {
        let file = log_file();
        let mut args = args(&file);
        args.handle = Some("Pilot1".to_string());
        args.killer_mode = true;
        args.show_all = true;

        let summary = parse_log_file(&args).unwrap();
        assert_eq!(summary.events.len(), 3);
        assert_eq!(summary.counters, Some(Counters { kills: 1, deaths: 2 }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = ParseArgs {
            path: PathBuf::from("/no/such/Game.log"),
            handle: None,
            killer_mode: false,
            show_all: false,
            json: false,
        };
        assert!(parse_log_file(&args).is_err());
    }
}
