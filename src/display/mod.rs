//! Display formatting for terminal output

pub mod transaction;

pub use transaction::{
    format_item, format_ledger_table, format_transaction_details, format_transaction_line,
    transaction_labels,
};
