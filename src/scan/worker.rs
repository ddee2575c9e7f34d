//! Scan worker - the task that owns the store and counters of one session

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use super::reader::{read_log, ReadReport};
use super::ScanConfig;
use crate::event::KillEvent;
use crate::notification::{Alert, AlertSink, KillEventLog};
use crate::session::{Counters, EventStore, SessionEvaluator};

/// Lifecycle of a scan session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Running,
    Stopped,
    Failed { reason: String },
}

impl ScanState {
    pub fn is_running(&self) -> bool {
        matches!(self, ScanState::Running)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanState::Idle => write!(f, "idle"),
            ScanState::Running => write!(f, "running"),
            ScanState::Stopped => write!(f, "stopped"),
            ScanState::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Requests from the display side while a scan runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCommand {
    /// Switch the non-player filter; clears the display and re-evaluates
    SetShowAll(bool),
}

/// Result of one evaluation pass
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Events shown for the first time, newest first
    pub displayed: Vec<KillEvent>,
    pub counters: Counters,
    /// Events added to the store by this pass
    pub new_events: usize,
    pub total_events: usize,
    pub malformed_lines: usize,
    pub scanned_at: DateTime<Local>,
}

/// Messages from the worker to the display
#[derive(Debug, Clone)]
pub enum ScanUpdate {
    Started {
        handle: String,
        log_path: PathBuf,
        kill_log: Option<PathBuf>,
    },
    Tick(TickReport),
    /// Everything displayed so far is void, a fresh evaluation follows
    Reset { show_all: bool },
    /// The worker gave up; no further updates follow
    Failed { reason: String },
}

enum Wake {
    Stop,
    Command(ScanCommand),
    Elapsed,
}

pub(super) struct ScanWorker {
    config: ScanConfig,
    store: EventStore,
    evaluator: SessionEvaluator,
    kill_log: Option<KillEventLog>,
    updates: mpsc::UnboundedSender<ScanUpdate>,
    alerts: Arc<dyn AlertSink>,
    state: watch::Sender<ScanState>,
    cancel: Arc<AtomicBool>,
    malformed_lines: usize,
}

impl ScanWorker {
    pub(super) fn new(
        config: ScanConfig,
        kill_log: Option<KillEventLog>,
        updates: mpsc::UnboundedSender<ScanUpdate>,
        alerts: Arc<dyn AlertSink>,
        state: watch::Sender<ScanState>,
    ) -> Self {
        let evaluator = SessionEvaluator::new(config.identity.clone(), config.show_all);
        Self {
            config,
            store: EventStore::new(),
            evaluator,
            kill_log,
            updates,
            alerts,
            state,
            cancel: Arc::new(AtomicBool::new(false)),
            malformed_lines: 0,
        }
    }

    pub(super) async fn run(
        mut self,
        mut stop: watch::Receiver<bool>,
        mut commands: mpsc::UnboundedReceiver<ScanCommand>,
    ) {
        self.state.send_replace(ScanState::Running);
        self.publish(ScanUpdate::Started {
            handle: self.config.identity.handle.clone(),
            log_path: self.config.log_path.clone(),
            kill_log: self.kill_log.as_ref().map(|log| log.path().to_path_buf()),
        });

        'scan: loop {
            let path = self.config.log_path.clone();
            let cancel = self.cancel.clone();
            let read = tokio::task::spawn_blocking(move || read_log(&path, &cancel));

            let joined = tokio::select! {
                biased;
                _ = stop_signal(&mut stop) => None,
                joined = read => Some(joined),
            };

            let report = match joined {
                None => {
                    self.cancel.store(true, Ordering::Relaxed);
                    break;
                }
                Some(Ok(Ok(Some(report)))) => report,
                // Read was cancelled
                Some(Ok(Ok(None))) => break,
                Some(Ok(Err(e))) => {
                    if stop_requested(&stop) {
                        break;
                    }
                    self.fail(format!("{}: {}", self.config.log_path.display(), e));
                    return;
                }
                Some(Err(e)) => {
                    if stop_requested(&stop) {
                        break;
                    }
                    self.fail(format!("log reader task failed: {}", e));
                    return;
                }
            };

            // No side effects once a stop has been requested
            if stop_requested(&stop) {
                break;
            }
            self.process(report);

            let deadline = Instant::now() + self.config.interval;
            loop {
                let wake = tokio::select! {
                    biased;
                    _ = stop_signal(&mut stop) => Wake::Stop,
                    Some(command) = commands.recv() => Wake::Command(command),
                    _ = sleep_until(deadline) => Wake::Elapsed,
                };
                match wake {
                    Wake::Stop => break 'scan,
                    Wake::Command(command) => self.handle_command(command),
                    Wake::Elapsed => break,
                }
            }
        }

        self.state.send_replace(ScanState::Stopped);
        info!(handle = %self.config.identity.handle, "Scan stopped");
    }

    fn process(&mut self, report: ReadReport) {
        self.malformed_lines = report.malformed_lines;
        debug!(
            lines = report.total_lines,
            candidates = report.events.len(),
            malformed = report.malformed_lines,
            "Log file read"
        );

        let inserted = self.store.ingest(report.events, &self.config.identity);
        let displayed = self.evaluator.evaluate(&self.store);

        if let Some(kill_log) = &self.kill_log {
            for event in &inserted {
                kill_log.append_or_log(event);
            }
        }

        self.publish_tick(displayed, inserted.len());
    }

    fn handle_command(&mut self, command: ScanCommand) {
        match command {
            ScanCommand::SetShowAll(show_all) => {
                if show_all == self.evaluator.show_all() {
                    return;
                }
                info!(show_all, "Show-all toggled, re-evaluating stored events");
                self.evaluator.reset(show_all);
                self.publish(ScanUpdate::Reset { show_all });
                let displayed = self.evaluator.evaluate(&self.store);
                self.publish_tick(displayed, 0);
            }
        }
    }

    fn publish_tick(&self, displayed: Vec<KillEvent>, new_events: usize) {
        self.publish(ScanUpdate::Tick(TickReport {
            displayed,
            counters: self.evaluator.counters(),
            new_events,
            total_events: self.store.len(),
            malformed_lines: self.malformed_lines,
            scanned_at: Local::now(),
        }));
    }

    fn publish(&self, update: ScanUpdate) {
        // A closed channel only means nobody is watching
        let _ = self.updates.send(update);
    }

    fn fail(&self, reason: String) {
        error!(reason = %reason, "Failed to read log file, stopping scan");
        self.alerts.alert(&Alert::log_read_failed());
        self.state.send_replace(ScanState::Failed {
            reason: reason.clone(),
        });
        self.publish(ScanUpdate::Failed { reason });
    }
}

/// Resolves once a stop was requested or the handle is gone
async fn stop_signal(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            return;
        }
    }
}

fn stop_requested(stop: &watch::Receiver<bool>) -> bool {
    *stop.borrow() || stop.has_changed().is_err()
}
