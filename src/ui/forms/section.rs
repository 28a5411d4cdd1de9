//! Current section rendering

use super::field_renderer::{draw_field, field_height};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the fields of the current section, stacked vertically
pub fn draw_section<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let engine = &app.engine;
    let nav = engine.navigation();

    let block = Block::default()
        .title(format!(
            " {} ({}/{}) ",
            engine.section_title(),
            nav.current_section_index + 1,
            nav.total_sections
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = engine.section_fields();
    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|view| Constraint::Length(field_height(view)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (index, view) in fields.iter().enumerate() {
        draw_field(
            frame,
            chunks[index],
            view,
            index == app.active_field && !engine.is_submitted(),
            app.option_cursor,
        );
    }
}
