//! UI module for rendering the TUI

mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw<S>(frame: &mut Frame, app: &App<S>) {
    let (header, body, status, help) = layout::create_layout(frame.area());

    layout::draw_header(frame, header, app);
    forms::draw_section(frame, body, app);
    layout::draw_status_bar(frame, status, app);
    layout::draw_help(frame, help, app);
}
