//! Ledger file persistence
//!
//! The ledger is read and written wholesale. Saves are atomic, and
//! initialization refuses to touch a path that already holds a file.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::file_io::{read_json_existing, write_json_atomic};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Ledger;

/// Handle to the ledger file on disk
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the whole ledger
    ///
    /// Fails with `LedgerNotFound` when the file is missing.
    pub fn load(&self) -> LedgerResult<Ledger> {
        if !self.path.is_file() {
            return Err(LedgerError::LedgerNotFound(self.path.clone()));
        }

        let ledger: Ledger = read_json_existing(&self.path)?;
        debug!(
            path = %self.path.display(),
            transactions = ledger.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }

    /// Write the whole ledger atomically
    pub fn save(&self, ledger: &Ledger) -> LedgerResult<()> {
        write_json_atomic(&self.path, ledger)?;
        debug!(
            path = %self.path.display(),
            transactions = ledger.len(),
            "Saved ledger"
        );
        Ok(())
    }

    /// Create a new, empty ledger file
    ///
    /// Fails with `AlreadyExists` without modifying anything when a file is
    /// already present at the path.
    pub fn initialize(&self) -> LedgerResult<Ledger> {
        if self.path.exists() {
            return Err(LedgerError::AlreadyExists(self.path.clone()));
        }

        let ledger = Ledger::new();
        self.save(&ledger)?;
        info!(path = %self.path.display(), "Initialized new ledger");
        Ok(ledger)
    }

    /// Initialize when asked to, otherwise load
    pub fn open(&self, initialize: bool) -> LedgerResult<Ledger> {
        if initialize {
            self.initialize()
        } else {
            self.load()
        }
    }
}
