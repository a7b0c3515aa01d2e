//! Storage layer for the receipt ledger
//!
//! JSON file storage with atomic writes.

pub mod file_io;
pub mod ledger;

pub use file_io::{copy_atomic, read_json, write_json_atomic};
pub use ledger::LedgerStore;
