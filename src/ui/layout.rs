//! Layout components (header, status bar, help line)

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Split the screen into header, form body, status bar and help line
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Section
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Help
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2], chunks[3])
}

/// Draw form title and description
pub fn draw_header<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let schema = app.engine.schema();
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            schema.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            schema.description.clone(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(paragraph, area);
}

/// Draw the status message, or validity when there is none
pub fn draw_status_bar<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let (text, color) = match &app.status_message {
        Some(message) if app.status_is_error => (message.clone(), Color::Red),
        Some(message) => (message.clone(), Color::Green),
        None if app.engine.is_valid() => ("Ready".to_string(), Color::DarkGray),
        None => (
            format!("{} field(s) need attention", app.engine.validation().len()),
            Color::Yellow,
        ),
    };
    frame.render_widget(
        Paragraph::new(format!(" {text}")).style(Style::default().fg(color)),
        area,
    );
}

/// Draw key hints, greying out navigation that is currently unavailable
pub fn draw_help<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let nav = app.engine.navigation();
    let hint = |key: &'static str, label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        vec![
            Span::styled(key, style.add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {label}  "), style),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(hint("Tab", "field", true));
    spans.extend(hint("^B", "back", nav.can_go_back));
    if nav.is_last_section {
        spans.extend(hint("^S", "submit", nav.can_submit));
    } else {
        spans.extend(hint("^N", "next", nav.can_go_next));
    }
    spans.extend(hint("Esc", "quit", true));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
