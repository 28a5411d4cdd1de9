//! Form domain layer
//!
//! Session state for a schema-driven multi-step form: typed field values,
//! the engine that validates and navigates, and the views renderers read.

mod field;
mod form_state;
mod view;

pub use field::{format_number, FieldInput, FieldValue, FormValues};
pub use form_state::{BackNavigation, EngineOptions, FormEngine, FormError, Phase};
pub use view::{FieldView, NavigationView};
