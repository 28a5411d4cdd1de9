//! Form field value objects

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Current values of one form session, keyed by field name
pub type FormValues = BTreeMap<String, FieldValue>;

/// Type-safe field values
///
/// Serialized untagged so a draft is a plain JSON object
/// (`{"name": "Ada", "year": 2025, "agree": true, "tags": ["a"]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Empty string or empty list. Booleans and numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Get the value as text, formatting scalars the way they are displayed
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            FieldValue::List(_) => None,
        }
    }

    /// Get the value as a finite number, parsing numeric text
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Bool(_) | FieldValue::List(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Get the selected options of a checkbox group (empty for other values)
    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::List(items) => items.join(", "),
            other => other.as_text().map(Cow::into_owned).unwrap_or_default(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// A change event coming from a field renderer
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Replace the stored value as-is
    Value(FieldValue),
    /// Check or uncheck one option of a checkbox group
    Option { value: String, checked: bool },
    /// Plain (single) checkbox
    Checked(bool),
}

impl FieldInput {
    /// Apply this change to the previous value of a field
    pub(crate) fn apply(self, previous: Option<&FieldValue>) -> FieldValue {
        match self {
            FieldInput::Value(value) => value,
            FieldInput::Checked(checked) => FieldValue::Bool(checked),
            FieldInput::Option { value, checked } => {
                let mut selected: Vec<String> =
                    previous.map(|v| v.as_list().to_vec()).unwrap_or_default();
                if checked {
                    if !selected.contains(&value) {
                        selected.push(value);
                    }
                } else {
                    selected.retain(|v| v != &value);
                }
                FieldValue::List(selected)
            }
        }
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
