//! Scan loop tests - real files, real worker task

use sc_kill_monitor::notification::read_kill_log;
use sc_kill_monitor::tui::App;
use sc_kill_monitor::{
    start_scan, Channel, Identity, MemoryAlertSink, ScanConfig, ScanState, ScanUpdate,
    Settings, SettingsHandle, TickReport,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

fn death_line(timestamp: &str, killed: &str, killer: &str) -> String {
    format!(
        "<{timestamp}> [Notice] <Actor Death> CActor::Kill: '{killed}' [200146295176] in zone 'OOC_Stanton_2b_Daymar' killed by '{killer}' [200146295177] using 'behr_rifle_ballistic_01_123' [Class unknown] with damage type 'Bullet' from direction x: 0.1, y: 0.2, z: 0.3 [Team_ActorTech][Actor]\n"
    )
}

fn write_log(path: &Path, lines: &[String]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        file.write_all(line.as_bytes()).unwrap();
    }
}

fn config(log_path: PathBuf, interval_secs: u64) -> ScanConfig {
    ScanConfig {
        identity: Identity::new("Pilot1", false),
        channel: Channel::Custom,
        log_path,
        interval: Duration::from_secs(interval_secs),
        show_all: false,
        write_to_file: false,
        kill_log_dir: PathBuf::from("logs"),
    }
}

async fn next_update(updates: &mut UnboundedReceiver<ScanUpdate>) -> ScanUpdate {
    timeout(Duration::from_secs(10), updates.recv())
        .await
        .expect("timed out waiting for an update")
        .expect("update channel closed")
}

async fn next_tick(updates: &mut UnboundedReceiver<ScanUpdate>) -> TickReport {
    loop {
        if let ScanUpdate::Tick(report) = next_update(updates).await {
            return report;
        }
    }
}

#[tokio::test]
async fn test_rescanning_unchanged_file_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(
        &log,
        &[
            "<2025-01-01T09:00:00Z> [Notice] <Join PU> connecting\n".to_string(),
            death_line("2025-01-01T10:00:00.000Z", "Pilot1", "Pilot2"),
            death_line("2025-01-01T11:00:00.000Z", "Pilot1", "Pilot3"),
            death_line("2025-01-01T12:00:00.000Z", "Pilot4", "Pilot5"),
        ],
    );

    let alerts = Arc::new(MemoryAlertSink::new());
    let (handle, mut updates) = start_scan(config(log, 1), alerts.clone());

    let first = next_tick(&mut updates).await;
    assert_eq!(first.displayed.len(), 2);
    assert_eq!(first.displayed[0].killer, "Pilot3");
    assert_eq!(first.counters.deaths, 2);
    assert_eq!(first.new_events, 2);

    let second = next_tick(&mut updates).await;
    assert!(second.displayed.is_empty());
    assert_eq!(second.new_events, 0);
    assert_eq!(second.total_events, 2);
    assert_eq!(second.counters.deaths, 2);

    assert_eq!(handle.stop().await, ScanState::Stopped);
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_appended_lines_show_up_on_next_tick() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(&log, &[death_line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2")]);

    let (handle, mut updates) = start_scan(config(log.clone(), 1), Arc::new(MemoryAlertSink::new()));
    let first = next_tick(&mut updates).await;
    assert_eq!(first.counters.deaths, 1);

    write_log(&log, &[death_line("2025-01-01T10:05:00Z", "Pilot1", "Pilot6")]);

    let mut report = next_tick(&mut updates).await;
    // The append may land right after a read
    if report.displayed.is_empty() {
        report = next_tick(&mut updates).await;
    }
    assert_eq!(report.displayed.len(), 1);
    assert_eq!(report.displayed[0].killer, "Pilot6");
    assert_eq!(report.counters.deaths, 2);

    handle.stop().await;
}

#[tokio::test]
async fn test_missing_file_alerts_once_and_fails() {
    let dir = TempDir::new().unwrap();
    let alerts = Arc::new(MemoryAlertSink::new());
    let (handle, mut updates) = start_scan(
        config(dir.path().join("missing.log"), 1),
        alerts.clone(),
    );

    assert!(matches!(
        next_update(&mut updates).await,
        ScanUpdate::Started { .. }
    ));
    assert!(matches!(
        next_update(&mut updates).await,
        ScanUpdate::Failed { .. }
    ));
    assert!(timeout(Duration::from_secs(3), updates.recv())
        .await
        .unwrap()
        .is_none());

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts.latest().unwrap().header, "Failed to read log file");
    assert!(matches!(handle.state(), ScanState::Failed { .. }));
    assert!(matches!(handle.stop().await, ScanState::Failed { .. }));
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn test_no_updates_or_writes_after_stop() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(&log, &[death_line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2")]);

    let mut scan_config = config(log.clone(), 1);
    scan_config.write_to_file = true;
    scan_config.kill_log_dir = dir.path().join("kills");

    let (handle, mut updates) = start_scan(scan_config, Arc::new(MemoryAlertSink::new()));
    next_tick(&mut updates).await;
    let kill_log = handle.kill_log_path().unwrap().to_path_buf();

    assert_eq!(handle.stop().await, ScanState::Stopped);
    while updates.try_recv().is_ok() {}

    write_log(&log, &[death_line("2025-01-01T10:05:00Z", "Pilot1", "Pilot6")]);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(updates.try_recv().is_err());
    assert_eq!(read_kill_log(&kill_log).unwrap().len(), 1);
}

#[tokio::test]
async fn test_new_events_are_persisted() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(
        &log,
        &[
            death_line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2"),
            death_line("2025-01-01T11:00:00Z", "Pilot1", "NPC_Pirate_01"),
        ],
    );

    let mut scan_config = config(log, 30);
    scan_config.write_to_file = true;
    scan_config.kill_log_dir = dir.path().join("kills");

    let (handle, mut updates) = start_scan(scan_config, Arc::new(MemoryAlertSink::new()));
    let tick = next_tick(&mut updates).await;
    // NPC events are hidden but still persisted
    assert_eq!(tick.displayed.len(), 1);

    let kill_log = handle.kill_log_path().unwrap().to_path_buf();
    let file_name = kill_log.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("kill-events_"));
    assert!(file_name.ends_with(".log"));

    let persisted = read_kill_log(&kill_log).unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].killer, "Pilot2");
    assert_eq!(persisted[1].killer, "NPC_Pirate_01");

    handle.stop().await;
}

#[tokio::test]
async fn test_show_all_toggle_reevaluates() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(
        &log,
        &[
            death_line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2"),
            death_line("2025-01-01T11:00:00Z", "Pilot1", "NPC_Pirate_01"),
        ],
    );

    let (handle, mut updates) = start_scan(config(log, 30), Arc::new(MemoryAlertSink::new()));
    let first = next_tick(&mut updates).await;
    assert_eq!(first.displayed.len(), 1);
    assert_eq!(first.counters.deaths, 1);

    assert!(handle.set_show_all(true));
    assert!(matches!(
        next_update(&mut updates).await,
        ScanUpdate::Reset { show_all: true }
    ));
    let again = next_tick(&mut updates).await;
    assert_eq!(again.displayed.len(), 2);
    assert_eq!(again.displayed[0].killer, "NPC_Pirate_01");
    assert_eq!(again.counters.deaths, 2);

    handle.stop().await;
}

#[tokio::test]
async fn test_dashboard_toggle_with_show_all_override() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    write_log(
        &log,
        &[
            death_line("2025-01-01T10:00:00Z", "Pilot1", "Pilot2"),
            death_line("2025-01-01T11:00:00Z", "Pilot1", "NPC_Pirate_01"),
        ],
    );

    // Saved show_all stays false while this run shows everything
    let settings = SettingsHandle::new(Settings::default());
    let mut scan_config = config(log, 30);
    scan_config.show_all = true;
    let mut app = App::new(&scan_config);

    let (handle, mut updates) = start_scan(scan_config, Arc::new(MemoryAlertSink::new()));
    let control = handle.control();
    settings.subscribe(move |s| {
        control.set_show_all(s.show_all);
    });

    let first = next_tick(&mut updates).await;
    assert_eq!(first.displayed.len(), 2);
    app.apply_update(ScanUpdate::Tick(first));

    assert!(!app.request_show_all_toggle(&settings));
    let reset = next_update(&mut updates).await;
    assert!(matches!(reset, ScanUpdate::Reset { show_all: false }));
    app.apply_update(reset);

    let hidden = next_tick(&mut updates).await;
    assert_eq!(hidden.displayed.len(), 1);
    assert_eq!(hidden.displayed[0].killer, "Pilot2");
    assert_eq!(hidden.counters.deaths, 1);
    assert!(!settings.snapshot().show_all);

    handle.stop().await;
}

#[tokio::test]
async fn test_stop_before_first_tick_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    let lines: Vec<String> = (0..50_000)
        .map(|i| death_line("2025-01-01T10:00:00Z", "Pilot1", &format!("Pilot{}", i + 2)))
        .collect();
    write_log(&log, &lines);

    let kill_dir = dir.path().join("kills");
    let mut scan_config = config(log, 1);
    scan_config.write_to_file = true;
    scan_config.kill_log_dir = kill_dir.clone();

    let (handle, mut updates) = start_scan(scan_config, Arc::new(MemoryAlertSink::new()));
    // Requested before the worker has read anything
    assert_eq!(handle.stop().await, ScanState::Stopped);

    let mut received = Vec::new();
    while let Ok(update) = updates.try_recv() {
        received.push(update);
    }
    assert!(received
        .iter()
        .all(|update| matches!(update, ScanUpdate::Started { .. })));
    assert!(!kill_dir.exists());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(updates.try_recv().is_err());
    assert!(!kill_dir.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_during_read_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("Game.log");
    let lines: Vec<String> = (0..100_000)
        .map(|i| death_line("2025-01-01T10:00:00Z", "Pilot1", &format!("Pilot{}", i + 2)))
        .collect();
    write_log(&log, &lines);

    let kill_dir = dir.path().join("kills");
    let mut scan_config = config(log, 30);
    scan_config.write_to_file = true;
    scan_config.kill_log_dir = kill_dir.clone();

    let (handle, mut updates) = start_scan(scan_config, Arc::new(MemoryAlertSink::new()));
    // The first read is under way once the worker announced itself
    assert!(matches!(
        next_update(&mut updates).await,
        ScanUpdate::Started { .. }
    ));
    let state = handle.stop().await;
    assert_eq!(state, ScanState::Stopped);

    // Either the stop beat the read, or the whole tick finished first
    let mut ticks = 0;
    while let Ok(update) = updates.try_recv() {
        if let ScanUpdate::Tick(report) = update {
            assert_eq!(report.new_events, 100_000);
            ticks += 1;
        }
    }
    if ticks == 0 {
        assert!(!kill_dir.exists());
    } else {
        assert_eq!(ticks, 1);
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(updates.try_recv().is_err());
}
