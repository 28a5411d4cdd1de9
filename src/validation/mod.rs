//! Validation engine: pure functions from (field, value) to an optional error

mod rules;

pub use rules::{validate_field, validate_form};

use std::collections::BTreeMap;

/// Active error message per field name. Absence means the field is valid.
///
/// Derived from values and schema only; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    errors: BTreeMap<String, String>,
}

impl ValidationState {
    /// Record the result of validating one field, clearing it on success
    pub fn set(&mut self, field: &str, error: Option<String>) {
        match error {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// The form is valid iff no field has an active error
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}
