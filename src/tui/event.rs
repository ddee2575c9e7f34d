//! Key handling

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::App;

#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Tick,
}

/// Something only the caller of the key handler can carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    ToggleShowAll,
}

pub fn poll_event(timeout: Duration) -> Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind == KeyEventKind::Press {
                return Ok(Some(TuiEvent::Key(key)));
            }
        }
        return Ok(None);
    }
    Ok(Some(TuiEvent::Tick))
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.next_event(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_event(),
        KeyCode::Char('a') => return Some(Request::ToggleShowAll),
        _ => {}
    }
    None
}
