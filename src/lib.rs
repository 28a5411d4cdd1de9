//! Stepform - schema-driven multi-step form engine
//!
//! A form's groups, field types, validation rules and defaults come from a
//! declarative JSON schema. [`FormEngine`] owns the session: it validates every
//! change, gates section navigation and submission on validity, and saves
//! progress through a [`DraftStore`].

pub mod persistence;
pub mod schema;
pub mod state;
pub mod validation;

pub use persistence::{DraftStore, FileDraftStore, MemoryDraftStore, PersistenceError};
pub use schema::{
    load_schema, load_schema_str, FieldDescriptor, FieldType, FormSchema, SchemaError,
};
pub use state::{
    BackNavigation, EngineOptions, FieldInput, FieldValue, FieldView, FormEngine, FormError,
    FormValues, NavigationView, Phase,
};
pub use validation::{validate_field, validate_form, ValidationState};
