//! receipt-ledger - local transaction ledger with managed receipt copies
//!
//! Keeps a JSON ledger of purchases and income and a directory of receipt
//! files copied in from elsewhere on disk, one per transaction at most.
//!
//! # Architecture
//!
//! - `config`: settings file and config directory resolution
//! - `error`: custom error types
//! - `models`: transactions, items, money and the ledger itself
//! - `storage`: atomic JSON persistence of the ledger
//! - `receipts`: the managed receipts directory
//! - `finder`: receipt search and interactive selection
//! - `editor`: prompts that fill in and revise transactions
//! - `shell`: the main menu loop
//! - `audit`: optional append-only change log
//!
//! # Example
//!
//! ```rust,ignore
//! use receipt_ledger::storage::LedgerStore;
//!
//! let store = LedgerStore::new("ledger.json");
//! let ledger = store.load()?;
//! println!("{} transactions", ledger.len());
//! ```

pub mod audit;
pub mod config;
pub mod console;
pub mod display;
pub mod editor;
pub mod error;
pub mod finder;
pub mod models;
pub mod receipts;
pub mod shell;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
