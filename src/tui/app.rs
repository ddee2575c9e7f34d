//! Dashboard state and main loop

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use super::event::{handle_key, poll_event, Request, TuiEvent};
use super::ui::render;
use crate::event::KillEvent;
use crate::notification::{Alert, MemoryAlertSink};
use crate::scan::{ScanConfig, ScanControl, ScanState, ScanUpdate};
use crate::session::Counters;
use crate::settings::{Channel, SettingsHandle};

pub type AppResult<T> = Result<T>;
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Dashboard state, fed by [`ScanUpdate`]s
pub struct App {
    pub should_quit: bool,
    pub handle: String,
    pub channel: Channel,
    pub killer_mode: bool,
    pub show_all: bool,
    pub log_path: PathBuf,
    pub kill_log: Option<PathBuf>,
    /// Displayed events, most recently displayed first
    pub events: Vec<KillEvent>,
    pub counters: Counters,
    pub selected_index: usize,
    pub state: ScanState,
    pub last_scan: Option<DateTime<Local>>,
    pub malformed_lines: usize,
    pub alert: Option<Alert>,
    pub tick: usize,
}

impl App {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            should_quit: false,
            handle: config.identity.handle.clone(),
            channel: config.channel,
            killer_mode: config.identity.killer_mode,
            show_all: config.show_all,
            log_path: config.log_path.clone(),
            kill_log: None,
            events: Vec::new(),
            counters: Counters::default(),
            selected_index: 0,
            state: ScanState::Idle,
            last_scan: None,
            malformed_lines: 0,
            alert: None,
            tick: 0,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn apply_update(&mut self, update: ScanUpdate) {
        match update {
            ScanUpdate::Started {
                log_path, kill_log, ..
            } => {
                self.state = ScanState::Running;
                self.log_path = log_path;
                self.kill_log = kill_log;
            }
            ScanUpdate::Tick(report) => {
                if !report.displayed.is_empty() {
                    let previous = std::mem::take(&mut self.events);
                    self.events = report.displayed.into_iter().chain(previous).collect();
                    self.selected_index = 0;
                }
                self.counters = report.counters;
                self.malformed_lines = report.malformed_lines;
                self.last_scan = Some(report.scanned_at);
            }
            ScanUpdate::Reset { show_all } => {
                self.show_all = show_all;
                self.events.clear();
                self.counters = Counters::default();
                self.selected_index = 0;
            }
            ScanUpdate::Failed { reason } => {
                self.state = ScanState::Failed { reason };
            }
        }
    }

    pub fn next_event(&mut self) {
        if !self.events.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.events.len();
        }
    }

    pub fn prev_event(&mut self) {
        if !self.events.is_empty() {
            self.selected_index = self
                .selected_index
                .checked_sub(1)
                .unwrap_or(self.events.len() - 1);
        }
    }

    pub fn selected_event(&self) -> Option<&KillEvent> {
        self.events.get(self.selected_index)
    }

    /// Whether the event counted as a kill of the monitored player
    pub fn is_kill(&self, event: &KillEvent) -> bool {
        self.killer_mode && event.killer == self.handle && event.killed_player != self.handle
    }

    /// Store the opposite of the filter on screen and return it
    ///
    /// The next value is derived from the running scan, never from the
    /// saved settings, which command line overrides leave untouched.
    pub fn request_show_all_toggle(&self, settings: &SettingsHandle) -> bool {
        let next = !self.show_all;
        settings.update(|s| s.show_all = next);
        next
    }
}

pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Draw until the user quits
///
/// Show-all toggles go through the settings handle, whose subscribers
/// persist the value and forward it to the scan worker.
pub fn run(
    terminal: &mut Tui,
    app: &mut App,
    updates: &mut UnboundedReceiver<ScanUpdate>,
    control: &ScanControl,
    settings: &SettingsHandle,
    alerts: &MemoryAlertSink,
) -> AppResult<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        while let Ok(update) = updates.try_recv() {
            app.apply_update(update);
        }
        if let ScanState::Stopped = control.state() {
            app.state = ScanState::Stopped;
        }
        app.alert = alerts.latest();

        terminal.draw(|frame| render(app, frame))?;

        match poll_event(tick_rate)? {
            Some(TuiEvent::Key(key)) => {
                if let Some(Request::ToggleShowAll) = handle_key(app, key) {
                    app.request_show_all_toggle(settings);
                }
            }
            Some(TuiEvent::Tick) => app.tick = app.tick.wrapping_add(1),
            None => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
