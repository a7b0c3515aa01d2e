//! Managed receipts directory
//!
//! Receipt copies are named `<transaction uuid>.<extension>` so the directory
//! stays in one-to-one correspondence with the ledger's receipt references.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Ledger, TransactionId};
use crate::storage::copy_atomic;

/// Appended to a receipt's name while it waits for the ledger save
const STAGED_SUFFIX: &str = ".staged";

/// A receipt copied into the receipts directory under a temporary name
#[derive(Debug)]
#[must_use = "a staged receipt must be promoted or discarded"]
pub struct StagedReceipt {
    staged: PathBuf,
    name: String,
}

impl StagedReceipt {
    /// The name the receipt gets once promoted
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The directory holding receipt copies
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    dir: PathBuf,
}

impl ReceiptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Receipt file name for a transaction, keeping the source's extension
    pub fn file_name_for(id: TransactionId, source: &Path) -> String {
        match source.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", id.file_stem(), ext.to_lowercase()),
            _ => id.file_stem(),
        }
    }

    /// Absolute location of a stored receipt
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.dir.join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).is_file()
    }

    /// Copy `source` into the receipts directory under a temporary name
    ///
    /// The copy stays invisible to the ledger until `promote` gives it the
    /// transaction's receipt name, so an existing receipt is untouched until
    /// then.
    pub fn stage(&self, source: &Path, id: TransactionId) -> LedgerResult<StagedReceipt> {
        if !source.is_file() {
            return Err(LedgerError::receipt_copy(source, "not a readable file"));
        }
        if !self.dir.is_dir() {
            return Err(LedgerError::receipt_copy(
                source,
                format!("receipts directory {} does not exist", self.dir.display()),
            ));
        }

        let name = Self::file_name_for(id, source);
        let staged = self.resolve(&format!("{}{}", name, STAGED_SUFFIX));

        let bytes = copy_atomic(source, &staged)
            .map_err(|e| LedgerError::receipt_copy(source, e.to_string()))?;

        debug!(
            source = %source.display(),
            staged = %staged.display(),
            bytes,
            "Staged receipt"
        );
        Ok(StagedReceipt { staged, name })
    }

    /// Move a staged copy to its receipt name, replacing any file there
    ///
    /// Returns the path relative to the receipts directory. On failure the
    /// staged copy is removed.
    pub fn promote(&self, staged: StagedReceipt) -> LedgerResult<String> {
        let dest = self.resolve(&staged.name);
        if let Err(e) = fs::rename(&staged.staged, &dest) {
            self.discard(staged);
            return Err(LedgerError::receipt_copy(&dest, e.to_string()));
        }

        info!(dest = %dest.display(), "Attached receipt");
        Ok(staged.name)
    }

    /// Remove a staged copy that will not be used
    pub fn discard(&self, staged: StagedReceipt) {
        if let Err(e) = fs::remove_file(&staged.staged) {
            warn!(path = %staged.staged.display(), error = %e, "Could not remove staged receipt");
        }
    }

    /// Remove a stored receipt
    ///
    /// A file that is already gone counts as detached: it is logged and
    /// `Ok(false)` is returned.
    pub fn detach(&self, relative: &str) -> LedgerResult<bool> {
        let path = self.resolve(relative);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed receipt");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Receipt already missing");
                Ok(false)
            }
            Err(e) => Err(LedgerError::Io(format!(
                "Failed to remove receipt {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Receipt references in the ledger whose file is missing
    pub fn dangling<'a>(&self, ledger: &'a Ledger) -> Vec<(TransactionId, &'a str)> {
        ledger
            .transactions
            .iter()
            .filter_map(|t| t.receipt_path.as_deref().map(|path| (t.id, path)))
            .filter(|(_, path)| !self.exists(path))
            .collect()
    }
}
