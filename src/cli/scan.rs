//! Scan command - validate the start inputs and run a scan session

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::output::{counters_line, event_output};
use crate::notification::{AlertSink, ConsoleAlertSink, MemoryAlertSink};
use crate::scan::{start_scan, ScanConfig, ScanState, ScanUpdate, StartRequest};
use crate::settings::{Channel, SettingsHandle, SettingsStore};
use crate::tui::{init_terminal, restore_terminal, run, App};

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Player handle to monitor (defaults to the saved handle)
    #[arg(long)]
    pub handle: Option<String>,

    /// Seconds between two reads of the log
    #[arg(long, short)]
    pub interval: Option<String>,

    /// Game channel whose log is read
    #[arg(long, value_enum)]
    pub channel: Option<Channel>,

    /// Read this log file instead of the channel's configured path
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Also show events involving NPCs
    #[arg(long)]
    pub show_all: bool,

    /// Count kills made by the handle
    #[arg(long)]
    pub killer_mode: bool,

    /// Append new events to a kill log file
    #[arg(long)]
    pub write_to_file: bool,

    /// Directory for kill log files
    #[arg(long)]
    pub kill_log_dir: Option<PathBuf>,

    /// Print events to stdout instead of opening the dashboard
    #[arg(long)]
    pub console: bool,

    /// Print events as JSON lines (console mode)
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Command line flags win over saved settings; switches only turn on
    pub fn apply(&self, request: &mut StartRequest, settings: &crate::settings::Settings) {
        if let Some(handle) = &self.handle {
            request.handle = handle.clone();
        }
        if let Some(interval) = &self.interval {
            request.interval = interval.clone();
        }
        if let Some(channel) = self.channel {
            request.channel = channel;
            request.path = settings.path_for(channel).to_string();
        }
        if let Some(path) = &self.path {
            request.path = path.to_string_lossy().into_owned();
        }
        request.show_all |= self.show_all;
        request.killer_mode |= self.killer_mode;
        request.write_to_file |= self.write_to_file;
        if let Some(dir) = &self.kill_log_dir {
            request.kill_log_dir = dir.clone();
        }
    }

    /// Whether this run draws the dashboard
    pub fn uses_dashboard(&self) -> bool {
        !self.console
    }
}

pub async fn handle_scan(args: ScanArgs, store: SettingsStore) -> Result<()> {
    let settings = SettingsHandle::new(store.load());
    let snapshot = settings.snapshot();

    let mut request = StartRequest::from_settings(&snapshot);
    args.apply(&mut request, &snapshot);

    let config = match request.validate() {
        Ok(config) => config,
        Err(e) => {
            ConsoleAlertSink.alert(&e.alert());
            bail!("cannot start scan: {}", e);
        }
    };

    if args.console {
        run_console(config, args.json).await
    } else {
        run_dashboard(config, settings, store).await
    }
}

async fn run_console(config: ScanConfig, json: bool) -> Result<()> {
    let killer_mode = config.identity.killer_mode;
    let alerts: Arc<dyn AlertSink> = Arc::new(ConsoleAlertSink);
    let (handle, mut updates) = start_scan(config, alerts);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping scan");
                break;
            }
            update = updates.recv() => match update {
                Some(update) => print_update(&update, killer_mode, json),
                None => break,
            },
        }
    }

    match handle.stop().await {
        ScanState::Failed { reason } => bail!("scan failed: {}", reason),
        _ => Ok(()),
    }
}

fn print_update(update: &ScanUpdate, killer_mode: bool, json: bool) {
    match update {
        ScanUpdate::Started {
            handle,
            log_path,
            kill_log,
        } => {
            eprintln!("Scanning {} for {}", log_path.display(), handle);
            if let Some(path) = kill_log {
                eprintln!("Writing kill events to {}", path.display());
            }
        }
        ScanUpdate::Tick(report) => {
            for event in &report.displayed {
                println!("{}", event_output(event, json));
            }
            if !report.displayed.is_empty() && !json {
                println!("{}", counters_line(&report.counters, killer_mode));
            }
        }
        ScanUpdate::Reset { show_all } => {
            if !json {
                println!("--- display reset (show all: {}) ---", show_all);
            }
        }
        // Already reported through the alert sink
        ScanUpdate::Failed { .. } => {}
    }
}

async fn run_dashboard(config: ScanConfig, settings: SettingsHandle, store: SettingsStore) -> Result<()> {
    let alerts = Arc::new(MemoryAlertSink::new());
    let (handle, mut updates) = start_scan(config.clone(), alerts.clone());

    let control = handle.control();
    let listener_control = handle.control();
    let subscription = settings.subscribe(move |updated| {
        store.save_or_log(updated);
        listener_control.set_show_all(updated.show_all);
    });

    let dashboard_settings = settings.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<()> {
        let mut terminal = init_terminal()?;
        let mut app = App::new(&config);
        let result = run(
            &mut terminal,
            &mut app,
            &mut updates,
            &control,
            &dashboard_settings,
            &alerts,
        );
        restore_terminal(&mut terminal)?;
        result
    })
    .await?;

    settings.unsubscribe(subscription);
    let state = handle.stop().await;
    result?;

    if let ScanState::Failed { reason } = state {
        eprintln!("Scan failed: {}", reason);
    }
    Ok(())
}
