//! Per-field validation rules
//!
//! Rules are local predicates over `(field, value)`. The required check runs
//! first; the field's validators run in declaration order only when a value
//! is present, and the first failure wins.

use super::ValidationState;
use crate::schema::{FieldDescriptor, FormSchema, Validator};
use crate::state::{FieldValue, FormValues};

/// Validate one candidate value against its field descriptor
pub fn validate_field(field: &FieldDescriptor, value: Option<&FieldValue>) -> Option<String> {
    let present = value.filter(|v| !v.is_empty());

    let Some(value) = present else {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    };

    field
        .validators
        .iter()
        .find(|validator| !passes(field, validator, value))
        .map(|validator| validator.message().to_string())
}

/// Validate every field of every group
pub fn validate_form(schema: &FormSchema, values: &FormValues) -> ValidationState {
    let mut state = ValidationState::default();
    for field in schema.fields() {
        state.set(&field.name, validate_field(field, values.get(&field.name)));
    }
    state
}

/// Validators that do not apply to the field's type always pass
fn passes(field: &FieldDescriptor, validator: &Validator, value: &FieldValue) -> bool {
    match validator {
        Validator::Range { min, max, .. } => {
            if !field.field_type.is_numeric() {
                return true;
            }
            // Non-numeric input is out of range
            value
                .as_number()
                .is_some_and(|n| n >= *min && n <= *max)
        }
        Validator::Pattern { regex, .. } => {
            if !field.field_type.is_textual() {
                return true;
            }
            value.as_text().is_some_and(|text| regex.is_match(&text))
        }
    }
}
