//! Form engine: values, validation and step navigation for one session

use super::field::{FieldInput, FieldValue, FormValues};
use super::view::{FieldView, NavigationView};
use crate::persistence::{DraftStore, PersistenceError};
use crate::schema::FormSchema;
use crate::validation::{validate_field, ValidationState};
use thiserror::Error;

/// Rejected engine operations
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Cannot change section while {0} field(s) have errors")]
    NavigationBlocked(usize),

    #[error("Cannot submit while {0} field(s) have errors")]
    SubmissionBlocked(usize),

    #[error("Already at the first section")]
    AtFirstSection,

    #[error("Already at the last section")]
    AtLastSection,

    #[error("Form has already been submitted")]
    AlreadySubmitted,

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Where the session is in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing { section: usize },
    /// Terminal for the session; remembers the section it was submitted from
    Submitted { section: usize },
}

impl Phase {
    pub fn section(&self) -> usize {
        match self {
            Phase::Editing { section } | Phase::Submitted { section } => *section,
        }
    }
}

/// Whether Back honours active errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackNavigation {
    /// Back is rejected while any field has an error
    #[default]
    BlockedByErrors,
    Unrestricted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub back_navigation: BackNavigation,
}

/// Owns the values, validation state and navigation state of a form session
#[derive(Debug)]
pub struct FormEngine<S> {
    schema: FormSchema,
    store: S,
    values: FormValues,
    validation: ValidationState,
    phase: Phase,
    options: EngineOptions,
}

impl<S: DraftStore> FormEngine<S> {
    /// Start a session, restoring the saved draft if there is one
    pub fn initialize(schema: FormSchema, store: S) -> Self {
        Self::with_options(schema, store, EngineOptions::default())
    }

    pub fn with_options(schema: FormSchema, store: S, options: EngineOptions) -> Self {
        let mut validation = ValidationState::default();

        let values = match store.load_draft() {
            Some(draft) => {
                let values = restore(&schema, draft);
                // Flag invalid restored values right away
                for (name, value) in &values {
                    if let Some(field) = schema.field(name) {
                        validation.set(name, validate_field(field, Some(value)));
                    }
                }
                tracing::info!(
                    "Restored draft with {} value(s), {} error(s)",
                    values.len(),
                    validation.len()
                );
                values
            }
            None => {
                let values: FormValues = schema
                    .fields()
                    .filter_map(|f| f.default.clone().map(|d| (f.name.clone(), d)))
                    .collect();
                tracing::debug!("No draft, seeded {} default(s)", values.len());
                values
            }
        };

        Self {
            schema,
            store,
            values,
            validation,
            phase: Phase::Editing { section: 0 },
            options,
        }
    }

    /// Apply a change event and revalidate that field only
    ///
    /// Returns the field's error message after the change, if any.
    pub fn set_field_value(
        &mut self,
        name: &str,
        input: FieldInput,
    ) -> Result<Option<String>, FormError> {
        if matches!(self.phase, Phase::Submitted { .. }) {
            return Err(FormError::AlreadySubmitted);
        }
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        let value = input.apply(self.values.get(name));
        let error = validate_field(field, Some(&value));
        tracing::debug!(field = name, ?value, ?error, "Field changed");

        self.values.insert(name.to_string(), value);
        self.validation.set(name, error.clone());
        Ok(error)
    }

    /// Save the draft and advance one section
    pub fn go_next(&mut self) -> Result<usize, FormError> {
        let section = self.editing_section()?;
        if !self.validation.is_valid() {
            return Err(FormError::NavigationBlocked(self.validation.len()));
        }
        if section + 1 >= self.schema.section_count() {
            return Err(FormError::AtLastSection);
        }

        self.store.save_draft(&self.values)?;
        self.phase = Phase::Editing {
            section: section + 1,
        };
        tracing::info!("Advanced to section {}", section + 1);
        Ok(section + 1)
    }

    /// Return to the previous section
    pub fn go_back(&mut self) -> Result<usize, FormError> {
        let section = self.editing_section()?;
        if self.options.back_navigation == BackNavigation::BlockedByErrors
            && !self.validation.is_valid()
        {
            return Err(FormError::NavigationBlocked(self.validation.len()));
        }
        if section == 0 {
            return Err(FormError::AtFirstSection);
        }

        self.phase = Phase::Editing {
            section: section - 1,
        };
        tracing::info!("Went back to section {}", section - 1);
        Ok(section - 1)
    }

    /// Durably save the completed draft and end the session
    pub fn submit(&mut self) -> Result<(), FormError> {
        let section = self.editing_section()?;
        if !self.validation.is_valid() {
            return Err(FormError::SubmissionBlocked(self.validation.len()));
        }

        self.store.save_draft(&self.values)?;
        self.phase = Phase::Submitted { section };
        tracing::info!("Form submitted with {} value(s)", self.values.len());
        Ok(())
    }

    fn editing_section(&self) -> Result<usize, FormError> {
        match self.phase {
            Phase::Editing { section } => Ok(section),
            Phase::Submitted { .. } => Err(FormError::AlreadySubmitted),
        }
    }
}

impl<S> FormEngine<S> {
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_section_index(&self) -> usize {
        self.phase.section()
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted { .. })
    }

    /// Value and error of one field for a renderer
    pub fn field_view(&self, name: &str) -> Option<FieldView<'_>> {
        self.schema.field(name).map(|descriptor| FieldView {
            descriptor,
            value: self.values.get(name),
            error: self.validation.error(name),
        })
    }

    /// Views of every field in the current section
    pub fn section_fields(&self) -> Vec<FieldView<'_>> {
        self.schema
            .group(self.current_section_index())
            .map(|group| {
                group
                    .fields
                    .iter()
                    .map(|descriptor| FieldView {
                        descriptor,
                        value: self.values.get(&descriptor.name),
                        error: self.validation.error(&descriptor.name),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn section_title(&self) -> &str {
        self.schema
            .group(self.current_section_index())
            .map(|g| g.title.as_str())
            .unwrap_or_default()
    }

    /// Navigation state for Back/Next/Submit controls
    pub fn navigation(&self) -> NavigationView {
        let section = self.current_section_index();
        let total = self.schema.section_count();
        let editing = !self.is_submitted();
        let valid = self.is_valid();
        let back_allowed =
            valid || self.options.back_navigation == BackNavigation::Unrestricted;

        NavigationView {
            current_section_index: section,
            total_sections: total,
            can_go_back: editing && section > 0 && back_allowed,
            can_go_next: editing && section + 1 < total && valid,
            can_submit: editing && valid,
            is_last_section: section + 1 >= total,
        }
    }
}

/// Keep only draft entries that name a schema field
fn restore(schema: &FormSchema, draft: FormValues) -> FormValues {
    draft
        .into_iter()
        .filter(|(name, _)| {
            let known = schema.field(name).is_some();
            if !known {
                tracing::debug!("Dropping unknown draft key {name:?}");
            }
            known
        })
        .collect()
}
