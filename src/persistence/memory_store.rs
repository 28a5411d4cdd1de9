//! In-process draft slot

use super::{encode, DraftStore, PersistenceError};
use crate::state::FormValues;

/// Holds the draft as serialized JSON, like the file store does on disk
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: Option<String>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an arbitrary payload in the slot
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }

    /// The serialized draft, if one was saved
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load_draft(&self) -> Option<FormValues> {
        let raw = self.slot.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!("Ignoring corrupt in-memory draft: {e}");
                None
            }
        }
    }

    fn save_draft(&mut self, values: &FormValues) -> Result<(), PersistenceError> {
        self.slot = Some(encode(values, false)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_store_has_no_draft() {
        assert!(MemoryDraftStore::new().load_draft().is_none());
    }

    #[test]
    fn test_save_then_load_returns_equal_values() {
        let mut values = FormValues::new();
        values.insert("name".into(), FieldValue::from("Ada"));
        values.insert("year".into(), FieldValue::Number(2025.0));
        values.insert("agree".into(), FieldValue::Bool(true));
        values.insert("langs".into(), FieldValue::List(vec!["rs".into(), "go".into()]));

        let mut store = MemoryDraftStore::new();
        store.save_draft(&values).unwrap();
        assert_eq!(store.load_draft(), Some(values));
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = MemoryDraftStore::new();
        let mut first = FormValues::new();
        first.insert("a".into(), FieldValue::from("1"));
        store.save_draft(&first).unwrap();

        let second = FormValues::new();
        store.save_draft(&second).unwrap();
        assert_eq!(store.load_draft(), Some(second));
        assert_eq!(store.raw(), Some("{}"));
    }

    #[test]
    fn test_non_finite_number_is_not_saved() {
        let mut values = FormValues::new();
        values.insert("name".into(), FieldValue::from("Ada"));
        values.insert("budget".into(), FieldValue::Number(f64::NAN));

        let mut store = MemoryDraftStore::new();
        let err = store.save_draft(&values).unwrap_err();
        assert!(matches!(err, PersistenceError::NonFiniteNumber(name) if name == "budget"));
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn test_corrupt_draft_is_no_draft() {
        assert!(MemoryDraftStore::with_raw("{not json").load_draft().is_none());
        assert!(MemoryDraftStore::with_raw("[1, 2]").load_draft().is_none());
    }
}
