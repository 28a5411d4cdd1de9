//! Read-only snapshots handed to field renderers and navigation controls

use super::field::FieldValue;
use crate::schema::FieldDescriptor;

/// What a renderer needs to draw one field
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub value: Option<&'a FieldValue>,
    pub error: Option<&'a str>,
}

impl FieldView<'_> {
    /// Current value as shown to the user, empty when absent
    pub fn display_value(&self) -> String {
        self.value.map(FieldValue::display_value).unwrap_or_default()
    }

    /// Whether a checkbox-group option is currently checked
    pub fn is_checked(&self, option: &str) -> bool {
        match self.value {
            Some(FieldValue::List(items)) => items.iter().any(|v| v == option),
            Some(FieldValue::Bool(checked)) => *checked,
            _ => false,
        }
    }
}

/// State of the Back / Next / Submit controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationView {
    pub current_section_index: usize,
    pub total_sections: usize,
    pub can_go_back: bool,
    pub can_go_next: bool,
    pub can_submit: bool,
    pub is_last_section: bool,
}
