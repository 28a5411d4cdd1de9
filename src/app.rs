//! Application state and key handling
//!
//! Translates key presses into field change events and navigation calls on
//! the engine. Holds only presentation state (focus, option cursor, status).

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stepform::{
    DraftStore, FieldDescriptor, FieldInput, FieldType, FieldValue, FormEngine, FormError,
};

/// Main application struct
pub struct App<S> {
    pub engine: FormEngine<S>,
    /// Index of the focused field within the current section
    pub active_field: usize,
    /// Highlighted option of a focused checkbox group
    pub option_cursor: usize,
    /// Feedback shown in the status bar
    pub status_message: Option<String>,
    /// Whether the last status message reports a failure
    pub status_is_error: bool,
    quit: bool,
}

impl<S: DraftStore> App<S> {
    pub fn new(engine: FormEngine<S>) -> Self {
        let mut app = Self {
            engine,
            active_field: 0,
            option_cursor: 0,
            status_message: None,
            status_is_error: false,
            quit: false,
        };
        if !app.engine.values().is_empty() && !app.engine.is_valid() {
            app.set_error("Restored draft has errors");
        }
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn field_count(&self) -> usize {
        self.engine
            .schema()
            .group(self.engine.current_section_index())
            .map(|g| g.fields.len())
            .unwrap_or(0)
    }

    /// Descriptor of the focused field
    pub fn active_descriptor(&self) -> Option<&FieldDescriptor> {
        self.engine
            .schema()
            .group(self.engine.current_section_index())
            .and_then(|g| g.fields.get(self.active_field))
    }

    pub fn next_field(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
            self.option_cursor = 0;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        self.active_field = if self.active_field == 0 {
            count - 1
        } else {
            self.active_field - 1
        };
        self.option_cursor = 0;
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('n') if ctrl => self.go_next(),
            KeyCode::Char('b') if ctrl => self.go_back(),
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Tab => self.next_field(),
            KeyCode::BackTab => self.prev_field(),
            _ if self.engine.is_submitted() => {}
            _ => self.handle_field_key(key),
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(field) = self.active_descriptor().cloned() else {
            return;
        };
        let current = self.engine.value(&field.name).cloned();

        let input = match (field.field_type, key.code) {
            (FieldType::Text | FieldType::Textarea | FieldType::Number, KeyCode::Char(c)) => {
                let mut text = current.map(|v| v.display_value()).unwrap_or_default();
                text.push(c);
                Some(FieldInput::Value(FieldValue::Text(text)))
            }
            (FieldType::Text | FieldType::Textarea | FieldType::Number, KeyCode::Backspace) => {
                let mut text = current.map(|v| v.display_value()).unwrap_or_default();
                text.pop();
                Some(FieldInput::Value(FieldValue::Text(text)))
            }
            (FieldType::Textarea, KeyCode::Enter) => {
                let mut text = current.map(|v| v.display_value()).unwrap_or_default();
                text.push('\n');
                Some(FieldInput::Value(FieldValue::Text(text)))
            }
            (FieldType::Dropdown | FieldType::Radio, KeyCode::Left | KeyCode::Right) => {
                let forward = key.code == KeyCode::Right;
                cycle_option(&field, current.as_ref(), forward)
                    .map(|value| FieldInput::Value(FieldValue::Text(value)))
            }
            (FieldType::Slider | FieldType::Number, KeyCode::Left | KeyCode::Right) => {
                let forward = key.code == KeyCode::Right;
                Some(FieldInput::Value(FieldValue::Number(step_number(
                    &field,
                    current.as_ref(),
                    forward,
                ))))
            }
            (FieldType::Checkbox, KeyCode::Up) => {
                self.option_cursor = self.option_cursor.saturating_sub(1);
                None
            }
            (FieldType::Checkbox, KeyCode::Down) => {
                if self.option_cursor + 1 < field.options.len() {
                    self.option_cursor += 1;
                }
                None
            }
            (FieldType::Checkbox, KeyCode::Char(' ')) => {
                if field.is_checkbox_group() {
                    field.options.get(self.option_cursor).map(|option| {
                        let checked = current
                            .as_ref()
                            .is_some_and(|v| v.as_list().contains(&option.value));
                        FieldInput::Option {
                            value: option.value.clone(),
                            checked: !checked,
                        }
                    })
                } else {
                    let checked = matches!(current, Some(FieldValue::Bool(true)));
                    Some(FieldInput::Checked(!checked))
                }
            }
            _ => None,
        };

        if let Some(input) = input {
            if let Err(e) = self.engine.set_field_value(&field.name, input) {
                self.set_error(e.to_string());
            }
        }
    }

    fn go_next(&mut self) {
        match self.engine.go_next() {
            Ok(_) => {
                self.active_field = 0;
                self.option_cursor = 0;
                self.set_info(format!("Draft saved at {}", Local::now().format("%H:%M:%S")));
            }
            Err(e) => self.report(e),
        }
    }

    fn go_back(&mut self) {
        match self.engine.go_back() {
            Ok(_) => {
                self.active_field = 0;
                self.option_cursor = 0;
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn submit(&mut self) {
        match self.engine.submit() {
            Ok(()) => self.set_info(format!(
                "Form submitted successfully at {}",
                Local::now().format("%H:%M:%S")
            )),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: FormError) {
        if let FormError::Persistence(ref inner) = error {
            tracing::warn!("Draft was not saved: {inner}");
        }
        self.set_error(error.to_string());
    }
}

/// Next/previous option value of a dropdown or radio group, wrapping
fn cycle_option(
    field: &FieldDescriptor,
    current: Option<&FieldValue>,
    forward: bool,
) -> Option<String> {
    let count = field.options.len();
    if count == 0 {
        return None;
    }
    let position = current
        .and_then(|v| v.as_text())
        .and_then(|text| field.options.iter().position(|o| o.value == text));
    let index = match (position, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(i), true) => (i + 1) % count,
        (Some(i), false) => (i + count - 1) % count,
    };
    Some(field.options[index].value.clone())
}

/// Step a numeric value, clamped to the field bounds
fn step_number(field: &FieldDescriptor, current: Option<&FieldValue>, forward: bool) -> f64 {
    let step = field.step_or_default();
    let base = current
        .and_then(FieldValue::as_number)
        .or(field.min)
        .unwrap_or(0.0);
    let mut next = if forward { base + step } else { base - step };
    if let Some(min) = field.min {
        next = next.max(min);
    }
    if let Some(max) = field.max {
        next = next.min(max);
    }
    next
}
