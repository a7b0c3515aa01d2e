//! Error types for the receipt ledger
//!
//! Fatal errors (bad arguments, ledger initialization problems) end the
//! process; everything else is reported and control returns to the menu.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad or missing command-line arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// The ledger file does not exist and initialization was not requested
    #[error("Ledger file not found: {}", .0.display())]
    LedgerNotFound(PathBuf),

    /// Refusing to initialize over an existing file
    #[error("A file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A receipt could not be copied into the receipts directory
    #[error("Could not copy receipt {}: {reason}", .path.display())]
    ReceiptCopy { path: PathBuf, reason: String },

    /// The receipt search produced nothing to choose from
    #[error("No receipt files found under {}", .0.display())]
    NoCandidates(PathBuf),

    /// Input ended before the current prompt was answered
    #[error("Input cancelled")]
    Cancelled,

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a receipt copy error
    pub fn receipt_copy(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ReceiptCopy {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors that should terminate the process rather than return to the menu
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Usage(_) | Self::LedgerNotFound(_) | Self::AlreadyExists(_)
        )
    }

    /// Check if the user ran out of input mid-prompt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::AlreadyExists(PathBuf::from("ledger.json"));
        assert_eq!(err.to_string(), "A file already exists at ledger.json");

        let err = LedgerError::transaction_not_found("txn-1234abcd");
        assert_eq!(err.to_string(), "Transaction not found: txn-1234abcd");

        let err = LedgerError::receipt_copy("/tmp/scan.pdf", "permission denied");
        assert_eq!(
            err.to_string(),
            "Could not copy receipt /tmp/scan.pdf: permission denied"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(LedgerError::Usage("missing ledger_file".into()).is_fatal());
        assert!(LedgerError::LedgerNotFound(PathBuf::from("x.json")).is_fatal());
        assert!(LedgerError::AlreadyExists(PathBuf::from("x.json")).is_fatal());
        assert!(!LedgerError::NoCandidates(PathBuf::from("/tmp")).is_fatal());
        assert!(!LedgerError::receipt_copy("a.pdf", "gone").is_fatal());
        assert!(!LedgerError::Cancelled.is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }

    #[test]
    fn test_predicates() {
        assert!(LedgerError::Cancelled.is_cancelled());
        assert!(LedgerError::Validation("empty".into()).is_validation());
        assert!(!LedgerError::Json("bad".into()).is_validation());
    }
}
