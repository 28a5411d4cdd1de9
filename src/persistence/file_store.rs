//! JSON file draft store

use super::{encode, DraftStore, PersistenceError};
use crate::state::FormValues;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the draft slot inside the data directory
pub const DRAFT_FILE_NAME: &str = "formData.json";

/// Draft stored as a JSON object in a single file
///
/// Saves write a sibling temporary file and rename it into place, so a
/// reader never observes a half-written draft.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl DraftStore for FileDraftStore {
    fn load_draft(&self) -> Option<FormValues> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No draft at {}", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read draft {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!("Ignoring corrupt draft {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save_draft(&mut self, values: &FormValues) -> Result<(), PersistenceError> {
        let json = encode(values, true)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved draft to {}", self.path.display());
        Ok(())
    }
}
