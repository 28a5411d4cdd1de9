//! Configuration handling for the terminal front-end

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stepform::persistence::DRAFT_FILE_NAME;
use stepform::{BackNavigation, EngineOptions};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Schema used when no path is given on the command line
    pub schema_path: Option<PathBuf>,
    /// Where the draft is kept (defaults to the data directory)
    pub draft_path: Option<PathBuf>,
    /// Allow Back while fields have errors
    pub allow_back_with_errors: Option<bool>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "stepform", "stepform")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file, defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Command-line path wins over the configured one
    pub fn resolve_schema_path(&self, cli: Option<PathBuf>) -> Option<PathBuf> {
        cli.or_else(|| self.schema_path.clone())
    }

    /// Configured draft path, or `formData.json` in the data directory
    pub fn resolve_draft_path(&self) -> Option<PathBuf> {
        self.draft_path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join(DRAFT_FILE_NAME))
        })
    }

    pub fn engine_options(&self) -> EngineOptions {
        let back_navigation = if self.allow_back_with_errors.unwrap_or(false) {
            BackNavigation::Unrestricted
        } else {
            BackNavigation::BlockedByErrors
        };
        EngineOptions { back_navigation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.schema_path.is_none());
        assert!(config.draft_path.is_none());
        assert!(config.allow_back_with_errors.is_none());
        assert_eq!(
            config.engine_options().back_navigation,
            BackNavigation::BlockedByErrors
        );
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: AppConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.schema_path.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"draft_path": "/tmp/d.json", "unknown_field": "value"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.draft_path, Some(PathBuf::from("/tmp/d.json")));
    }

    #[test]
    fn test_allow_back_with_errors() {
        let config = AppConfig {
            allow_back_with_errors: Some(true),
            ..Default::default()
        };
        assert_eq!(
            config.engine_options().back_navigation,
            BackNavigation::Unrestricted
        );
    }

    #[test]
    fn test_cli_schema_path_wins() {
        let config = AppConfig {
            schema_path: Some(PathBuf::from("configured.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_schema_path(Some(PathBuf::from("cli.json"))),
            Some(PathBuf::from("cli.json"))
        );
        assert_eq!(
            config.resolve_schema_path(None),
            Some(PathBuf::from("configured.json"))
        );
    }

    #[test]
    fn test_configured_draft_path_wins() {
        let config = AppConfig {
            draft_path: Some(PathBuf::from("/var/draft.json")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_draft_path(),
            Some(PathBuf::from("/var/draft.json"))
        );
    }

    #[test]
    fn test_default_draft_path_uses_slot_name() {
        if let Some(path) = AppConfig::default().resolve_draft_path() {
            assert!(path.ends_with(DRAFT_FILE_NAME));
        }
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.schema_path.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"allow_back_with_errors": true}"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.allow_back_with_errors, Some(true));
    }

    #[test]
    fn test_load_from_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
