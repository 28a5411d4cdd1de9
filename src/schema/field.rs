//! Field descriptors and their declarative validators

use crate::state::FieldValue;
use regex::Regex;
use std::fmt;

/// Closed set of field types a schema may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Textarea,
    Dropdown,
    Radio,
    Checkbox,
    Slider,
    Number,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        Self::Text,
        Self::Textarea,
        Self::Dropdown,
        Self::Radio,
        Self::Checkbox,
        Self::Slider,
        Self::Number,
    ];

    /// Parse the authored type tag, `None` for anything outside the closed set
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Slider => "slider",
            Self::Number => "number",
        }
    }

    /// Types that cannot be rendered without an option list
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::Dropdown | Self::Radio | Self::Checkbox)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Slider | Self::Number)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic role that attaches built-in validators to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Email,
    Phone,
    GraduationYear,
}

impl FieldRole {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "graduationYear" => Some(Self::GraduationYear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::GraduationYear => "graduationYear",
        }
    }

    /// The only field type each role's built-in rule applies to
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Email | Self::Phone => FieldType::Text,
            Self::GraduationYear => FieldType::Number,
        }
    }
}

/// One selectable option of a dropdown, radio or checkbox group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A rule attached to a field, evaluated after the required check
#[derive(Debug, Clone)]
pub enum Validator {
    /// Inclusive numeric bounds, applies to numeric fields
    Range { min: f64, max: f64, message: String },
    /// Whole-value pattern match, applies to textual fields
    Pattern { regex: Regex, message: String },
}

impl Validator {
    pub fn message(&self) -> &str {
        match self {
            Validator::Range { message, .. } | Validator::Pattern { message, .. } => message,
        }
    }
}

/// Schema-level definition of one form field
///
/// Immutable once loaded. Per-session error messages live in
/// [`crate::validation::ValidationState`], never on the descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub options: Vec<FieldOption>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub placeholder: Option<String>,
    pub role: Option<FieldRole>,
    pub validators: Vec<Validator>,
}

impl FieldDescriptor {
    /// Create a descriptor with no constraints
    pub fn new(name: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            default: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            placeholder: None,
            role: None,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|o| {
                let value: String = o.into();
                FieldOption::new(value.clone(), value)
            })
            .collect();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Checkbox fields with options hold a list of checked option values
    pub fn is_checkbox_group(&self) -> bool {
        self.field_type == FieldType::Checkbox && !self.options.is_empty()
    }

    /// Slider/number increment, defaulting to 1
    pub fn step_or_default(&self) -> f64 {
        self.step.filter(|s| *s > 0.0).unwrap_or(1.0)
    }
}

/// One step of the multi-step form
#[derive(Debug, Clone)]
pub struct FieldGroup {
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
}

/// A loaded form definition
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: String,
    pub description: String,
    pub groups: Vec<FieldGroup>,
}

impl FormSchema {
    pub fn section_count(&self) -> usize {
        self.groups.len()
    }

    /// Iterate over every field of every group in order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    pub fn group(&self, index: usize) -> Option<&FieldGroup> {
        self.groups.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parse_round_trips_every_tag() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::parse(t.as_str()), Some(t));
        }
        assert_eq!(FieldType::parse("date"), None);
        assert_eq!(FieldType::parse("Text"), None);
    }

    #[test]
    fn test_requires_options() {
        assert!(FieldType::Dropdown.requires_options());
        assert!(FieldType::Radio.requires_options());
        assert!(FieldType::Checkbox.requires_options());
        assert!(!FieldType::Text.requires_options());
        assert!(!FieldType::Slider.requires_options());
    }

    #[test]
    fn test_role_field_types() {
        assert_eq!(FieldRole::Email.field_type(), FieldType::Text);
        assert_eq!(FieldRole::Phone.field_type(), FieldType::Text);
        assert_eq!(FieldRole::GraduationYear.field_type(), FieldType::Number);
        assert_eq!(FieldRole::parse("phoneNumber"), None);
    }

    #[test]
    fn test_checkbox_group_needs_options() {
        let plain = FieldDescriptor::new("agree", "Agree", FieldType::Checkbox);
        assert!(!plain.is_checkbox_group());
        let group = plain.with_options(["a", "b"]);
        assert!(group.is_checkbox_group());
    }

    #[test]
    fn test_step_or_default() {
        let mut field = FieldDescriptor::new("n", "N", FieldType::Slider);
        assert_eq!(field.step_or_default(), 1.0);
        field.step = Some(5.0);
        assert_eq!(field.step_or_default(), 5.0);
        field.step = Some(0.0);
        assert_eq!(field.step_or_default(), 1.0);
    }

    #[test]
    fn test_schema_field_lookup_spans_groups() {
        let schema = FormSchema {
            title: "T".into(),
            description: String::new(),
            groups: vec![
                FieldGroup {
                    title: "One".into(),
                    fields: vec![FieldDescriptor::new("a", "A", FieldType::Text)],
                },
                FieldGroup {
                    title: "Two".into(),
                    fields: vec![FieldDescriptor::new("b", "B", FieldType::Number)],
                },
            ],
        };
        assert_eq!(schema.section_count(), 2);
        assert_eq!(schema.fields().count(), 2);
        assert_eq!(schema.field("b").unwrap().field_type, FieldType::Number);
        assert!(schema.field("c").is_none());
    }
}
