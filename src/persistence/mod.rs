//! Draft persistence: one implicit slot holding the serialized form values

mod file_store;
mod memory_store;

pub use file_store::{FileDraftStore, DRAFT_FILE_NAME};
pub use memory_store::MemoryDraftStore;

use crate::state::{FieldValue, FormValues};
use thiserror::Error;

/// Failure to durably save a draft
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to write draft: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Field '{0}' holds a number JSON cannot store")]
    NonFiniteNumber(String),
}

/// Serialize a draft, refusing values that would not read back unchanged
///
/// JSON has no NaN or infinity; serde_json writes them as `null`, which the
/// draft loader then rejects.
fn encode(values: &FormValues, pretty: bool) -> Result<String, PersistenceError> {
    if let Some((name, _)) = values
        .iter()
        .find(|(_, value)| matches!(value, FieldValue::Number(n) if !n.is_finite()))
    {
        return Err(PersistenceError::NonFiniteNumber(name.clone()));
    }
    let json = if pretty {
        serde_json::to_string_pretty(values)?
    } else {
        serde_json::to_string(values)?
    };
    Ok(json)
}

/// Trait for draft storage, enabling in-memory fakes and mocks in tests
#[cfg_attr(test, mockall::automock)]
pub trait DraftStore {
    /// Most recently saved draft. Missing or unreadable drafts are `None`.
    fn load_draft(&self) -> Option<FormValues>;

    /// Overwrite the draft. Once this returns `Ok`, `load_draft` sees it.
    fn save_draft(&mut self, values: &FormValues) -> Result<(), PersistenceError>;
}

impl<S: DraftStore + ?Sized> DraftStore for Box<S> {
    fn load_draft(&self) -> Option<FormValues> {
        (**self).load_draft()
    }

    fn save_draft(&mut self, values: &FormValues) -> Result<(), PersistenceError> {
        (**self).save_draft(values)
    }
}

impl<S: DraftStore + ?Sized> DraftStore for &mut S {
    fn load_draft(&self) -> Option<FormValues> {
        (**self).load_draft()
    }

    fn save_draft(&mut self, values: &FormValues) -> Result<(), PersistenceError> {
        (**self).save_draft(values)
    }
}
