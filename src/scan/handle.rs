//! Scan handle - starts the worker and stops it again

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::worker::{ScanCommand, ScanState, ScanUpdate, ScanWorker};
use super::ScanConfig;
use crate::notification::{session_suffix, AlertSink, KillEventLog};

/// Start a scan session on the current tokio runtime
///
/// Returns the handle controlling the worker and the receiving end of its
/// updates. Counters and the event store start empty on every call.
pub fn start_scan(
    config: ScanConfig,
    alerts: Arc<dyn AlertSink>,
) -> (ScanHandle, mpsc::UnboundedReceiver<ScanUpdate>) {
    let started_at = Local::now();
    let kill_log = config
        .write_to_file
        .then(|| KillEventLog::new(&config.kill_log_dir, &session_suffix(&started_at)));
    let kill_log_path = kill_log.as_ref().map(|log| log.path().to_path_buf());

    info!(
        handle = %config.identity.handle,
        channel = %config.channel,
        path = %config.log_path.display(),
        interval_secs = config.interval.as_secs(),
        killer_mode = config.identity.killer_mode,
        "Starting scan"
    );

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = watch::channel(false);
    let (state_tx, state_rx) = watch::channel(ScanState::Idle);

    let worker = ScanWorker::new(config.clone(), kill_log, update_tx, alerts, state_tx);
    let join = tokio::spawn(worker.run(stop_rx, command_rx));

    let handle = ScanHandle {
        config,
        started_at,
        kill_log_path,
        stop_tx,
        control: ScanControl {
            commands: command_tx,
            state: state_rx,
        },
        join,
    };
    (handle, update_rx)
}

/// Owner of a running scan
///
/// Dropping the handle without [`stop`](Self::stop) also ends the worker,
/// but without waiting for it.
pub struct ScanHandle {
    config: ScanConfig,
    started_at: DateTime<Local>,
    kill_log_path: Option<PathBuf>,
    stop_tx: watch::Sender<bool>,
    control: ScanControl,
    join: JoinHandle<()>,
}

impl ScanHandle {
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Persistence file of this session, if writing is enabled
    pub fn kill_log_path(&self) -> Option<&Path> {
        self.kill_log_path.as_deref()
    }

    pub fn state(&self) -> ScanState {
        self.control.state()
    }

    /// Cloneable command side for displays and settings listeners
    pub fn control(&self) -> ScanControl {
        self.control.clone()
    }

    pub fn set_show_all(&self, show_all: bool) -> bool {
        self.control.set_show_all(show_all)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Request cancellation and wait until the worker has exited
    ///
    /// Once this returns, the worker sends no further updates and writes
    /// nothing more to the kill log.
    pub async fn stop(self) -> ScanState {
        // Fails only when the worker already exited
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.join.await {
            warn!(error = %e, "Scan worker ended abnormally");
        }
        let state = self.control.state();
        info!(state = %state, "Scan stop acknowledged");
        state
    }
}

/// Command and state access shared with the display side
#[derive(Clone)]
pub struct ScanControl {
    commands: mpsc::UnboundedSender<ScanCommand>,
    state: watch::Receiver<ScanState>,
}

impl ScanControl {
    /// Returns false when the worker has already exited
    pub fn set_show_all(&self, show_all: bool) -> bool {
        self.commands.send(ScanCommand::SetShowAll(show_all)).is_ok()
    }

    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }
}
