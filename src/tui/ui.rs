//! Dashboard rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::App;
use crate::event::{format_kill_date, format_kill_event};
use crate::scan::ScanState;

const SPINNER: &[&str] = &["◐", "◓", "◑", "◒"];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status
            Constraint::Length(3), // counters
            Constraint::Min(8),    // events
            Constraint::Length(1), // help or alert
        ])
        .split(area);

    render_status(app, frame, vertical[0]);
    render_counters(app, frame, vertical[1]);

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(vertical[2]);
    render_event_list(app, frame, main_area[0]);
    render_event_detail(app, frame, main_area[1]);

    render_footer(app, frame, vertical[3]);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let icon = match app.state {
        ScanState::Running => SPINNER[(app.tick / 2) % SPINNER.len()],
        ScanState::Failed { .. } => "✗",
        ScanState::Idle | ScanState::Stopped => "○",
    };
    let last_scan = app
        .last_scan
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = format!(
        " SCKM {} {} │ {} │ {} │ {} │ last scan {}",
        icon,
        app.state,
        app.handle,
        app.channel,
        app.log_path.display(),
        last_scan
    );
    let style = match app.state {
        ScanState::Failed { .. } => Style::default().bg(Color::Red).fg(Color::White),
        _ => Style::default().bg(Color::Blue).fg(Color::White),
    };
    frame.render_widget(Paragraph::new(status).style(style), area);
}

fn render_counters(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    // Kills are only tracked in killer mode
    if app.killer_mode {
        spans.push(Span::styled(
            format!(" Kills: {} ", app.counters.kills),
            Style::default().fg(Color::Green).bold(),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!(" Deaths: {} ", app.counters.deaths),
        Style::default().fg(Color::Red).bold(),
    ));
    if app.show_all {
        spans.push(Span::styled("  [all]", Style::default().fg(Color::Yellow)));
    }
    if app.malformed_lines > 0 {
        spans.push(Span::styled(
            format!("  {} malformed", app.malformed_lines),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let counters =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" Session "));
    frame.render_widget(counters, area);
}

fn render_event_list(app: &App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let marker = if i == app.selected_index { "→ " } else { "  " };
            let color = if app.is_kill(event) {
                Color::Green
            } else {
                Color::Red
            };
            let text = format!(
                "{}{}  {} ← {}",
                marker,
                format_kill_date(&event.timestamp),
                event.killed_player,
                event.killer
            );
            ListItem::new(text).style(Style::default().fg(color))
        })
        .collect();

    let title = format!(" Events ({}) ", app.events.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}

fn render_event_detail(app: &App, frame: &mut Frame, area: Rect) {
    let content = match app.selected_event() {
        Some(event) => format_kill_event(event),
        None => "No kill events yet".to_string(),
    };
    let detail = Paragraph::new(content).block(Block::default().borders(Borders::ALL).title(" Detail "));
    frame.render_widget(detail, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let footer = match &app.alert {
        Some(alert) => Paragraph::new(format!(" {}: {} ", alert.header, alert.message))
            .style(Style::default().bg(Color::Red).fg(Color::White)),
        None => {
            let toggle = if app.show_all { "hide NPC" } else { "show all" };
            Paragraph::new(format!(" [j/k] move  [a] {}  [q] quit ", toggle))
                .style(Style::default().bg(Color::DarkGray))
        }
    };
    frame.render_widget(footer, area);
}
