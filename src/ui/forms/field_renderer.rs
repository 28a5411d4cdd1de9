//! Field rendering for every schema field type

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use stepform::state::format_number;
use stepform::{FieldType, FieldView};

/// Rows a field needs, including borders and its error line
pub fn field_height(view: &FieldView) -> u16 {
    let body = match view.descriptor.field_type {
        FieldType::Textarea => 4,
        FieldType::Checkbox => view.descriptor.options.len().max(1) as u16,
        _ => 1,
    };
    body + 2 + u16::from(view.error.is_some())
}

/// Draw one field with its current value and error
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    view: &FieldView,
    is_active: bool,
    option_cursor: usize,
) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else if view.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let required = if view.descriptor.required { " *" } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", view.descriptor.label, required))
        .borders(Borders::ALL)
        .border_style(border_style);

    let (input_area, error_area) = if view.error.is_some() && area.height > 1 {
        (
            Rect {
                height: area.height - 1,
                ..area
            },
            Some(Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            }),
        )
    } else {
        (area, None)
    };

    match view.descriptor.field_type {
        FieldType::Slider => draw_slider(frame, input_area, view, block),
        FieldType::Checkbox => {
            let lines = checkbox_lines(view, is_active, option_cursor);
            frame.render_widget(Paragraph::new(lines).block(block), input_area);
        }
        FieldType::Dropdown | FieldType::Radio => {
            let line = choice_line(view, is_active);
            frame.render_widget(Paragraph::new(line).block(block), input_area);
        }
        FieldType::Text | FieldType::Textarea | FieldType::Number => {
            let content = text_content(view, is_active);
            frame.render_widget(
                content.wrap(Wrap { trim: false }).block(block),
                input_area,
            );
        }
    }

    if let (Some(area), Some(error)) = (error_area, view.error) {
        frame.render_widget(
            Paragraph::new(format!(" {error}")).style(Style::default().fg(Color::Red)),
            area,
        );
    }
}

fn text_content<'a>(view: &FieldView, is_active: bool) -> Paragraph<'a> {
    let value = view.display_value();
    let cursor = if is_active { "▌" } else { "" };

    if value.is_empty() && !is_active {
        let placeholder = view
            .descriptor
            .placeholder
            .clone()
            .unwrap_or_else(|| "(empty)".to_string());
        return Paragraph::new(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines: Vec<Line> = value.lines().map(|l| Line::from(l.to_string())).collect();
    if value.ends_with('\n') || lines.is_empty() {
        lines.push(Line::default());
    }
    if let Some(last) = lines.last_mut() {
        last.spans
            .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
    }
    Paragraph::new(lines)
}

fn choice_line<'a>(view: &FieldView, is_active: bool) -> Line<'a> {
    let selected = view.value.and_then(|v| v.as_text()).and_then(|text| {
        view.descriptor
            .options
            .iter()
            .find(|o| o.value == text)
            .map(|o| o.label.clone())
    });
    let (label, style) = match selected {
        Some(label) => (label, Style::default()),
        None => (
            view.descriptor
                .placeholder
                .clone()
                .unwrap_or_else(|| "Select an option".to_string()),
            Style::default().fg(Color::DarkGray),
        ),
    };

    if is_active {
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::Cyan)),
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
            Span::styled(" ▶", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(Span::styled(label, style))
    }
}

fn checkbox_lines<'a>(view: &FieldView, is_active: bool, option_cursor: usize) -> Vec<Line<'a>> {
    if !view.descriptor.is_checkbox_group() {
        let mark = if view.is_checked("") { "[x]" } else { "[ ]" };
        return vec![Line::from(mark)];
    }

    view.descriptor
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let mark = if view.is_checked(&option.value) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if is_active && i == option_cursor {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{mark} {}", option.label), style))
        })
        .collect()
}

fn draw_slider(frame: &mut Frame, area: Rect, view: &FieldView, block: Block) {
    let min = view.descriptor.min.unwrap_or(0.0);
    let max = view.descriptor.max.unwrap_or(100.0);
    let value = view
        .value
        .and_then(|v| v.as_number())
        .filter(|n| n.is_finite())
        .unwrap_or(min);
    let ratio = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format_number(value));
    frame.render_widget(gauge, area);
}
