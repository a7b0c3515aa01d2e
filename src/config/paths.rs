//! Path management for the receipt ledger
//!
//! ## Path Resolution Order
//!
//! 1. `RECEIPT_LEDGER_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/receipt-ledger` on Linux)
//!
//! The ledger file and receipts directory are always given on the command
//! line; only settings live here.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};

use crate::error::LedgerError;

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "RECEIPT_LEDGER_CONFIG_DIR";

/// Locations of the tool's own files
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    config_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve paths from the environment and platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        Self::resolve(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
    }

    fn resolve(override_dir: Option<PathBuf>) -> Result<Self, LedgerError> {
        if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(Self::with_config_dir(dir));
        }

        let dirs = ProjectDirs::from("", "", "receipt-ledger").ok_or_else(|| {
            LedgerError::Config("Could not determine the user's config directory".into())
        })?;
        Ok(Self::with_config_dir(dirs.config_dir().to_path_buf()))
    }

    /// Use a specific config directory (useful for testing)
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create config directory: {}", e)))
    }
}

/// The user's home directory, the default root for receipt searches
pub fn home_dir() -> Result<PathBuf, LedgerError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| LedgerError::Config("Could not determine the home directory".into()))
}
