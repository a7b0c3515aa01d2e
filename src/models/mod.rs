//! Core data models for the receipt ledger
//!
//! - `TransactionId`: stable transaction identifier
//! - `Money`: item prices in cents
//! - `Transaction` and `Item`: one ledger entry and its lines
//! - `Ledger`: the ordered collection persisted as one file

pub mod ids;
pub mod ledger;
pub mod money;
pub mod transaction;

pub use ids::TransactionId;
pub use ledger::Ledger;
pub use money::Money;
pub use transaction::{parse_timestamp, Item, TextField, Transaction, TIMESTAMP_DISPLAY};
