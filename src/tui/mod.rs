//! Terminal dashboard for a running scan

mod app;
mod event;
mod ui;


pub use app::{init_terminal, restore_terminal, run, App, AppResult, Tui};
pub use event::{handle_key, poll_event, Request, TuiEvent};
pub use ui::render;
