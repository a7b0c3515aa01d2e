//! Transaction identifiers
//!
//! Ids are random UUIDs assigned once at creation. A deleted transaction's id
//! is never handed out again, so receipt file names derived from it stay unique.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "txn-";

/// Stable identifier of a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Full hyphenated form, used to name receipt files
    pub fn file_stem(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.to_string()[..8])
    }
}
