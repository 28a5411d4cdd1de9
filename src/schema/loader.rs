//! Schema loading from the authored JSON shape
//!
//! `{ "form": { "title", "description", "groups": [ { "title", "fields": [...] } ] } }`

use super::field::{
    FieldDescriptor, FieldGroup, FieldOption, FieldRole, FieldType, FormSchema, Validator,
};
use super::SchemaError;
use crate::state::{format_number, FieldValue};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// Loose email shape: `x@y.z` with no whitespace or extra `@`
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// Exactly ten decimal digits
pub const PHONE_PATTERN: &str = r"^[0-9]{10}$";

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number.";

#[derive(Debug, Deserialize)]
struct RawDocument {
    form: RawForm,
}

#[derive(Debug, Deserialize)]
struct RawForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    title: String,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    #[serde(default)]
    name: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    options: Option<Vec<RawOption>>,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    placeholder: Option<String>,
    role: Option<String>,
    #[serde(default)]
    validators: Vec<RawValidator>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Labeled { value: String, label: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawValidator {
    Range {
        min: f64,
        max: f64,
        message: Option<String>,
    },
    Pattern {
        regex: String,
        message: Option<String>,
    },
}

/// Load a schema from its JSON text
pub fn load_schema_str(raw: &str) -> Result<FormSchema, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    load_schema(value)
}

/// Load and check a schema from an already-parsed JSON document
pub fn load_schema(raw: serde_json::Value) -> Result<FormSchema, SchemaError> {
    let document: RawDocument = serde_json::from_value(raw)?;
    let form = document.form;

    if form.groups.is_empty() {
        return Err(SchemaError::NoGroups);
    }

    let mut seen = HashSet::new();
    let mut groups = Vec::with_capacity(form.groups.len());
    for (group_index, group) in form.groups.into_iter().enumerate() {
        let mut fields = Vec::with_capacity(group.fields.len());
        for (field_index, field) in group.fields.into_iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::MissingName {
                    group: group_index,
                    field: field_index,
                });
            }
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateName(field.name));
            }
            fields.push(build_field(field)?);
        }
        groups.push(FieldGroup {
            title: group.title,
            fields,
        });
    }

    tracing::debug!(
        "Loaded schema {:?} with {} sections and {} fields",
        form.title,
        groups.len(),
        seen.len()
    );

    Ok(FormSchema {
        title: form.title,
        description: form.description,
        groups,
    })
}

fn build_field(raw: RawField) -> Result<FieldDescriptor, SchemaError> {
    let field_type = FieldType::parse(&raw.kind).ok_or_else(|| SchemaError::UnknownType {
        field: raw.name.clone(),
        kind: raw.kind.clone(),
    })?;

    let options: Vec<FieldOption> = raw
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|o| match o {
            RawOption::Plain(value) => FieldOption::new(value.clone(), value),
            RawOption::Labeled { value, label } => FieldOption::new(value, label),
        })
        .collect();
    if field_type.requires_options() && options.is_empty() {
        return Err(SchemaError::MissingOptions {
            field: raw.name,
            kind: field_type,
        });
    }

    if field_type.is_numeric() && (raw.min.is_none() || raw.max.is_none()) {
        return Err(SchemaError::MissingBounds(raw.name));
    }

    let mut field = FieldDescriptor {
        name: raw.name,
        label: raw.label,
        field_type,
        required: raw.required,
        default: None,
        options,
        min: raw.min,
        max: raw.max,
        step: raw.step,
        placeholder: raw.placeholder,
        role: None,
        validators: Vec::new(),
    };

    field.default = match raw.default {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(parse_default(&field, value)?),
    };

    field.role = match raw.role {
        Some(tag) => {
            let role = FieldRole::parse(&tag).ok_or_else(|| SchemaError::UnknownRole {
                field: field.name.clone(),
                role: tag,
            })?;
            if role.field_type() != field.field_type {
                return Err(SchemaError::RoleTypeMismatch {
                    field: field.name.clone(),
                    role: role.as_str(),
                    kind: field.field_type,
                });
            }
            Some(role)
        }
        None => infer_role(&field.name, field.field_type),
    };

    if let Some(role) = field.role {
        let validator = role_validator(role, &field)?;
        field.validators.push(validator);
    }
    for raw_validator in raw.validators {
        let validator = build_validator(raw_validator, &field)?;
        field.validators.push(validator);
    }

    Ok(field)
}

/// Legacy forms mark built-in rules by field name only
fn infer_role(name: &str, field_type: FieldType) -> Option<FieldRole> {
    match (name, field_type) {
        ("email", FieldType::Text) => Some(FieldRole::Email),
        ("phoneNumber", FieldType::Text) => Some(FieldRole::Phone),
        ("graduationYear", FieldType::Number) => Some(FieldRole::GraduationYear),
        _ => None,
    }
}

fn role_validator(role: FieldRole, field: &FieldDescriptor) -> Result<Validator, SchemaError> {
    match role {
        FieldRole::Email => Ok(Validator::Pattern {
            regex: compile(&field.name, EMAIL_PATTERN)?,
            message: EMAIL_MESSAGE.to_string(),
        }),
        FieldRole::Phone => Ok(Validator::Pattern {
            regex: compile(&field.name, PHONE_PATTERN)?,
            message: PHONE_MESSAGE.to_string(),
        }),
        FieldRole::GraduationYear => {
            let (min, max) = match (field.min, field.max) {
                (Some(min), Some(max)) => (min, max),
                _ => return Err(SchemaError::MissingBounds(field.name.clone())),
            };
            Ok(Validator::Range {
                min,
                max,
                message: format!(
                    "Graduation year must be between {} and {}.",
                    format_number(min),
                    format_number(max)
                ),
            })
        }
    }
}

fn build_validator(raw: RawValidator, field: &FieldDescriptor) -> Result<Validator, SchemaError> {
    match raw {
        RawValidator::Range { min, max, message } => {
            if !field.field_type.is_numeric() {
                return Err(SchemaError::ValidatorTypeMismatch {
                    field: field.name.clone(),
                    validator: "range",
                    kind: field.field_type,
                });
            }
            let message = message.unwrap_or_else(|| {
                format!(
                    "{} must be between {} and {}.",
                    field.label,
                    format_number(min),
                    format_number(max)
                )
            });
            Ok(Validator::Range { min, max, message })
        }
        RawValidator::Pattern { regex, message } => {
            if !field.field_type.is_textual() {
                return Err(SchemaError::ValidatorTypeMismatch {
                    field: field.name.clone(),
                    validator: "pattern",
                    kind: field.field_type,
                });
            }
            let regex = compile(&field.name, &regex)?;
            let message =
                message.unwrap_or_else(|| format!("{} is not in the expected format.", field.label));
            Ok(Validator::Pattern { regex, message })
        }
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex, SchemaError> {
    Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
        field: field.to_string(),
        source,
    })
}

fn parse_default(
    field: &FieldDescriptor,
    value: serde_json::Value,
) -> Result<FieldValue, SchemaError> {
    let mismatch = || SchemaError::DefaultMismatch {
        field: field.name.clone(),
        kind: field.field_type,
    };
    let parsed: FieldValue = serde_json::from_value(value).map_err(|_| mismatch())?;
    let matches = match (&parsed, field.field_type) {
        (FieldValue::List(_), FieldType::Checkbox) => field.is_checkbox_group(),
        (FieldValue::Bool(_), FieldType::Checkbox) => !field.is_checkbox_group(),
        (FieldValue::List(_), _) | (FieldValue::Bool(_), _) => false,
        (FieldValue::Number(_), t) => t.is_numeric(),
        (FieldValue::Text(_), FieldType::Checkbox) => false,
        (FieldValue::Text(_), t) if t.is_numeric() => parsed.as_number().is_some(),
        (FieldValue::Text(_), _) => true,
    };
    if matches {
        Ok(parsed)
    } else {
        Err(mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(groups: serde_json::Value) -> serde_json::Value {
        json!({ "form": { "title": "Signup", "description": "Tell us about you", "groups": groups } })
    }

    fn one_field(field: serde_json::Value) -> serde_json::Value {
        form(json!([{ "title": "Only", "fields": [field] }]))
    }

    mod valid {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_loads_all_field_types() {
            let raw = form(json!([
                { "title": "Basics", "fields": [
                    { "name": "name", "label": "Name", "type": "text", "required": true },
                    { "name": "bio", "label": "Bio", "type": "textarea" },
                    { "name": "country", "label": "Country", "type": "dropdown", "options": ["NL", "DE"] },
                ]},
                { "title": "More", "fields": [
                    { "name": "gender", "label": "Gender", "type": "radio",
                      "options": [{ "value": "f", "label": "Female" }, { "value": "m", "label": "Male" }] },
                    { "name": "langs", "label": "Languages", "type": "checkbox",
                      "options": [{ "value": "rs", "label": "Rust" }], "default": ["rs"] },
                    { "name": "level", "label": "Level", "type": "slider", "min": 0, "max": 10, "step": 2 },
                    { "name": "age", "label": "Age", "type": "number", "min": 0, "max": 120,
                      "default": 30 },
                ]},
            ]));

            let schema = load_schema(raw).unwrap();
            assert_eq!(schema.title, "Signup");
            assert_eq!(schema.description, "Tell us about you");
            assert_eq!(schema.section_count(), 2);
            assert_eq!(schema.fields().count(), 7);

            let country = schema.field("country").unwrap();
            assert_eq!(country.options[1], FieldOption::new("DE", "DE"));
            let gender = schema.field("gender").unwrap();
            assert_eq!(gender.options[0], FieldOption::new("f", "Female"));
            let langs = schema.field("langs").unwrap();
            assert_eq!(langs.default, Some(FieldValue::List(vec!["rs".into()])));
            let level = schema.field("level").unwrap();
            assert_eq!(level.step, Some(2.0));
            assert_eq!(schema.field("age").unwrap().default, Some(FieldValue::Number(30.0)));
        }

        #[test]
        fn test_load_from_str() {
            let raw = r#"{"form": {"title": "T", "groups": [{"title": "G", "fields": []}]}}"#;
            let schema = load_schema_str(raw).unwrap();
            assert_eq!(schema.section_count(), 1);
            assert_eq!(schema.description, "");
        }

        #[test]
        fn test_null_default_is_absent() {
            let schema =
                load_schema(one_field(json!({ "name": "a", "type": "text", "default": null })))
                    .unwrap();
            assert!(schema.field("a").unwrap().default.is_none());
        }

        #[test]
        fn test_numeric_text_default_allowed_for_number() {
            let schema = load_schema(one_field(
                json!({ "name": "n", "type": "number", "min": 0, "max": 9, "default": "5" }),
            ))
            .unwrap();
            assert_eq!(schema.field("n").unwrap().default, Some(FieldValue::from("5")));
        }
    }

    mod roles {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_legacy_names_attach_builtin_validators() {
            let raw = form(json!([{ "title": "Contact", "fields": [
                { "name": "email", "label": "Email", "type": "text" },
                { "name": "phoneNumber", "label": "Phone", "type": "text" },
                { "name": "graduationYear", "label": "Year", "type": "number", "min": 1950, "max": 2030 },
            ]}]));
            let schema = load_schema(raw).unwrap();

            let email = schema.field("email").unwrap();
            assert_eq!(email.role, Some(FieldRole::Email));
            assert_eq!(email.validators.len(), 1);
            assert_eq!(email.validators[0].message(), EMAIL_MESSAGE);

            let phone = schema.field("phoneNumber").unwrap();
            assert_eq!(phone.role, Some(FieldRole::Phone));
            assert_eq!(phone.validators[0].message(), PHONE_MESSAGE);

            let year = schema.field("graduationYear").unwrap();
            assert_eq!(year.role, Some(FieldRole::GraduationYear));
            assert_eq!(
                year.validators[0].message(),
                "Graduation year must be between 1950 and 2030."
            );
        }

        #[test]
        fn test_legacy_name_with_other_type_gets_no_role() {
            let schema =
                load_schema(one_field(json!({ "name": "email", "type": "textarea" }))).unwrap();
            let email = schema.field("email").unwrap();
            assert!(email.role.is_none());
            assert!(email.validators.is_empty());
        }

        #[test]
        fn test_explicit_role_on_any_name() {
            let schema = load_schema(one_field(
                json!({ "name": "contact", "label": "Contact", "type": "text", "role": "email" }),
            ))
            .unwrap();
            assert_eq!(schema.field("contact").unwrap().role, Some(FieldRole::Email));
        }

        #[test]
        fn test_unknown_role_is_error() {
            let err = load_schema(one_field(json!({ "name": "a", "type": "text", "role": "zip" })))
                .unwrap_err();
            assert!(matches!(err, SchemaError::UnknownRole { .. }));
        }

        #[test]
        fn test_role_type_mismatch_is_error() {
            let err = load_schema(one_field(
                json!({ "name": "a", "type": "number", "min": 0, "max": 1, "role": "email" }),
            ))
            .unwrap_err();
            assert!(matches!(err, SchemaError::RoleTypeMismatch { .. }));
        }

        #[test]
        fn test_graduation_year_without_bounds_is_error() {
            let err = load_schema(one_field(json!({ "name": "graduationYear", "type": "number" })))
                .unwrap_err();
            assert!(matches!(err, SchemaError::MissingBounds(name) if name == "graduationYear"));
        }
    }

    mod validators {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_authored_range_and_pattern() {
            let raw = form(json!([{ "title": "G", "fields": [
                { "name": "score", "label": "Score", "type": "slider", "min": 0, "max": 100,
                  "validators": [{ "kind": "range", "min": 10, "max": 90 }] },
                { "name": "zip", "label": "Zip", "type": "text",
                  "validators": [{ "kind": "pattern", "regex": "^[0-9]{4}[A-Z]{2}$", "message": "Bad zip" }] },
            ]}]));
            let schema = load_schema(raw).unwrap();
            assert_eq!(
                schema.field("score").unwrap().validators[0].message(),
                "Score must be between 10 and 90."
            );
            assert_eq!(schema.field("zip").unwrap().validators[0].message(), "Bad zip");
        }

        #[test]
        fn test_invalid_regex_is_error() {
            let err = load_schema(one_field(json!({ "name": "a", "type": "text",
                "validators": [{ "kind": "pattern", "regex": "(" }] })))
            .unwrap_err();
            assert!(matches!(err, SchemaError::InvalidPattern { .. }));
        }

        #[test]
        fn test_range_on_text_is_error() {
            let err = load_schema(one_field(json!({ "name": "a", "type": "text",
                "validators": [{ "kind": "range", "min": 0, "max": 1 }] })))
            .unwrap_err();
            assert!(matches!(err, SchemaError::ValidatorTypeMismatch { validator: "range", .. }));
        }

        #[test]
        fn test_unknown_validator_kind_is_json_error() {
            let err = load_schema(one_field(json!({ "name": "a", "type": "text",
                "validators": [{ "kind": "luhn" }] })))
            .unwrap_err();
            assert!(matches!(err, SchemaError::Json(_)));
        }
    }

    mod invalid {
        use super::*;

        #[test]
        fn test_empty_groups() {
            let err = load_schema(form(json!([]))).unwrap_err();
            assert!(matches!(err, SchemaError::NoGroups));
        }

        #[test]
        fn test_missing_groups_key() {
            let err = load_schema(json!({ "form": { "title": "T" } })).unwrap_err();
            assert!(matches!(err, SchemaError::NoGroups));
        }

        #[test]
        fn test_missing_form_key() {
            let err = load_schema(json!({ "title": "T" })).unwrap_err();
            assert!(matches!(err, SchemaError::Json(_)));
        }

        #[test]
        fn test_empty_name() {
            let err = load_schema(form(json!([
                { "title": "A", "fields": [{ "name": "ok", "type": "text" }] },
                { "title": "B", "fields": [{ "name": "x", "type": "text" }, { "type": "text" }] },
            ])))
            .unwrap_err();
            assert!(matches!(err, SchemaError::MissingName { group: 1, field: 1 }));
        }

        #[test]
        fn test_duplicate_name_across_groups() {
            let err = load_schema(form(json!([
                { "title": "A", "fields": [{ "name": "dup", "type": "text" }] },
                { "title": "B", "fields": [{ "name": "dup", "type": "number", "min": 0, "max": 1 }] },
            ])))
            .unwrap_err();
            assert!(matches!(err, SchemaError::DuplicateName(name) if name == "dup"));
        }

        #[test]
        fn test_unknown_type() {
            let err = load_schema(one_field(json!({ "name": "when", "type": "date" }))).unwrap_err();
            assert!(
                matches!(err, SchemaError::UnknownType { ref field, ref kind } if field == "when" && kind == "date")
            );
        }

        #[test]
        fn test_missing_type_is_unknown() {
            let err = load_schema(one_field(json!({ "name": "a" }))).unwrap_err();
            assert!(matches!(err, SchemaError::UnknownType { .. }));
        }

        #[test]
        fn test_options_required() {
            for kind in ["dropdown", "radio", "checkbox"] {
                let err = load_schema(one_field(json!({ "name": "a", "type": kind }))).unwrap_err();
                assert!(matches!(err, SchemaError::MissingOptions { .. }), "{kind}");
            }
            let err = load_schema(one_field(json!({ "name": "a", "type": "radio", "options": [] })))
                .unwrap_err();
            assert!(matches!(err, SchemaError::MissingOptions { .. }));
        }

        #[test]
        fn test_slider_needs_bounds() {
            let err = load_schema(one_field(json!({ "name": "s", "type": "slider", "min": 0 })))
                .unwrap_err();
            assert!(matches!(err, SchemaError::MissingBounds(_)));
        }

        #[test]
        fn test_number_needs_bounds() {
            let err = load_schema(one_field(json!({ "name": "n", "type": "number", "max": 5 })))
                .unwrap_err();
            assert!(matches!(err, SchemaError::MissingBounds(name) if name == "n"));
        }

        #[test]
        fn test_numeric_default_must_be_finite_number() {
            for default in ["NaN", "inf", "-infinity", "lots"] {
                let err = load_schema(one_field(json!({
                    "name": "level", "type": "slider", "min": 0, "max": 10, "default": default
                })))
                .unwrap_err();
                assert!(matches!(err, SchemaError::DefaultMismatch { .. }), "{default}");
            }
        }

        #[test]
        fn test_default_type_mismatch() {
            let cases = [
                json!({ "name": "a", "type": "text", "default": ["x"] }),
                json!({ "name": "a", "type": "text", "default": 3 }),
                json!({ "name": "a", "type": "checkbox", "options": ["x"], "default": "x" }),
                json!({ "name": "a", "type": "number", "min": 0, "max": 1, "default": true }),
            ];
            for case in cases {
                let err = load_schema(one_field(case.clone())).unwrap_err();
                assert!(matches!(err, SchemaError::DefaultMismatch { .. }), "{case}");
            }
        }
    }
}
