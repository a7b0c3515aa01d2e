//! Audit trail of ledger changes
//!
//! When enabled, every saved create, update and delete is appended to a JSONL
//! file with the transaction's state before and after.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
