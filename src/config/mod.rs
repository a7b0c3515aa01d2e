//! Configuration for the receipt ledger
//!
//! - Config directory resolution
//! - Optional user settings (pager, fuzzy selector, receipt search)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
