//! Schema model: the immutable, declarative form definition

mod field;
mod loader;

pub use field::{
    FieldDescriptor, FieldGroup, FieldOption, FieldRole, FieldType, FormSchema, Validator,
};
pub use loader::{
    load_schema, load_schema_str, EMAIL_MESSAGE, EMAIL_PATTERN, PHONE_MESSAGE, PHONE_PATTERN,
};

use thiserror::Error;

/// A malformed schema. Fatal: the form cannot initialize.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema is not valid JSON for a form: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema has no groups")]
    NoGroups,

    #[error("Field {field} of group {group} has no name")]
    MissingName { group: usize, field: usize },

    #[error("Field name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("Field '{field}' has unknown type '{kind}'")]
    UnknownType { field: String, kind: String },

    #[error("Field '{field}' of type {kind} needs options")]
    MissingOptions { field: String, kind: FieldType },

    #[error("Field '{0}' needs both min and max")]
    MissingBounds(String),

    #[error("Field '{field}' has a default that does not match type {kind}")]
    DefaultMismatch { field: String, kind: FieldType },

    #[error("Field '{field}' has unknown role '{role}'")]
    UnknownRole { field: String, role: String },

    #[error("Field '{field}' of type {kind} cannot have role '{role}'")]
    RoleTypeMismatch {
        field: String,
        role: &'static str,
        kind: FieldType,
    },

    #[error("Field '{field}' of type {kind} cannot have a {validator} validator")]
    ValidatorTypeMismatch {
        field: String,
        validator: &'static str,
        kind: FieldType,
    },

    #[error("Field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
