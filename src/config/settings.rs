//! User settings for the receipt ledger
//!
//! Settings are optional: a missing file means defaults, and every field
//! falls back to its default when absent from the JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tracing::{info, warn};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::storage::{read_json, write_json_atomic};

/// Newest settings layout this build understands
pub const SETTINGS_SCHEMA_VERSION: u32 = 1;

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Pager for long listings; `$PAGER` is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<String>,

    /// External fuzzy selector, used when found on `PATH`
    #[serde(default = "default_selector_program")]
    pub selector_program: String,

    /// File extensions the receipt search considers
    #[serde(default = "default_receipt_extensions")]
    pub receipt_extensions: Vec<String>,

    /// Cap on receipt search results
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Append-only audit log of ledger changes, disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    SETTINGS_SCHEMA_VERSION
}

fn default_selector_program() -> String {
    "fzf".to_string()
}

fn default_receipt_extensions() -> Vec<String> {
    ["jpg", "pdf", "png"].iter().map(|s| s.to_string()).collect()
}

fn default_max_results() -> usize {
    1000
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pager: None,
            selector_program: default_selector_program(),
            receipt_extensions: default_receipt_extensions(),
            max_results: default_max_results(),
            currency_symbol: default_currency(),
            audit_log: None,
        }
    }
}

impl Settings {
    /// Load settings from the config directory
    ///
    /// On first run the defaults are written there so they can be edited. A
    /// failure to write them is logged and the defaults are used anyway.
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();
        if settings_path.exists() {
            return Self::load_from(&settings_path);
        }

        let settings = Settings::default();
        match settings.save(paths) {
            Ok(()) => info!(path = %settings_path.display(), "Wrote default settings"),
            Err(e) => warn!(error = %e, "Could not write default settings"),
        }
        Ok(settings)
    }

    /// Load settings from an explicit file, defaulting when absent
    pub fn load_from(path: &Path) -> Result<Self, LedgerError> {
        let settings: Settings = read_json(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read settings {}: {}", path.display(), e))
        })?;

        if settings.schema_version > SETTINGS_SCHEMA_VERSION {
            return Err(LedgerError::Config(format!(
                "Settings {} use schema version {}, newer than the supported {}",
                path.display(),
                settings.schema_version,
                SETTINGS_SCHEMA_VERSION
            )));
        }
        Ok(settings)
    }

    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The configured pager, else the given `$PAGER` value
    pub fn pager_or(&self, env_pager: Option<String>) -> Option<String> {
        self.pager
            .clone()
            .or(env_pager)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
    }

    /// The pager to use, consulting `$PAGER`
    pub fn effective_pager(&self) -> Option<String> {
        self.pager_or(std::env::var("PAGER").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.selector_program, "fzf");
        assert_eq!(settings.receipt_extensions, vec!["jpg", "pdf", "png"]);
        assert_eq!(settings.max_results, 1000);
        assert!(settings.audit_log.is_none());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_config_dir(temp_dir.path().join("cfg"));

        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
        assert!(paths.settings_file().is_file());
        assert_eq!(Settings::load_from(&paths.settings_file()).unwrap(), Settings::default());
    }

    #[test]
    fn test_unwritable_config_dir_still_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        // A file where the config directory should be
        let blocked = temp_dir.path().join("cfg");
        std::fs::write(&blocked, "").unwrap();
        let paths = LedgerPaths::with_config_dir(blocked);

        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "schema_version": 2 }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
        assert!(err.to_string().contains("schema version 2"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_config_dir(temp_dir.path().join("cfg"));

        let mut settings = Settings::default();
        settings.pager = Some("less -R".into());
        settings.max_results = 50;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "receipt_extensions": ["heic"] }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.receipt_extensions, vec!["heic"]);
        assert_eq!(settings.selector_program, "fzf");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Settings::load_from(&path).unwrap_err(),
            LedgerError::Config(_)
        ));
    }

    #[test]
    fn test_pager_resolution() {
        let mut settings = Settings::default();
        assert_eq!(settings.pager_or(None), None);
        assert_eq!(settings.pager_or(Some("  ".into())), None);
        assert_eq!(settings.pager_or(Some("less".into())), Some("less".into()));

        settings.pager = Some("more".into());
        assert_eq!(settings.pager_or(Some("less".into())), Some("more".into()));
    }
}
