//! Receipt file bookkeeping
//!
//! Copies chosen receipt files into the managed receipts directory and removes
//! them again when their transaction goes away.

pub mod store;

pub use store::{ReceiptStore, StagedReceipt};
