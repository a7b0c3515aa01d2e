//! Receipt finder
//!
//! Searches a directory tree for receipt files and lets the user pick one,
//! through the fuzzy selector when installed and a numbered list otherwise.

pub mod pager;
pub mod search;
pub mod selector;

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::console::Console;
use crate::error::{LedgerError, LedgerResult};

pub use pager::page;
pub use search::{Candidates, ReceiptSearch};
pub use selector::{detect_selector, find_on_path, FuzzySelector, ListSelector, Selector};

/// Finds receipt files under one search root
#[derive(Debug, Clone)]
pub struct ReceiptFinder {
    root: PathBuf,
    extensions: Vec<String>,
    max_results: usize,
}

impl ReceiptFinder {
    pub fn new(root: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            root: root.into(),
            extensions: settings.receipt_extensions.clone(),
            max_results: settings.max_results,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A search under the root, optionally filtered by `query`
    pub fn search(&self, query: Option<&str>) -> ReceiptSearch {
        ReceiptSearch::new(&self.root)
            .with_extensions(&self.extensions)
            .with_max_results(self.max_results)
            .with_query(query)
    }

    /// Let the user pick one of `candidates`
    ///
    /// Fails with `NoCandidates` when there is nothing to pick from; a
    /// cancelled selection is `Ok(None)`.
    pub fn choose(
        &self,
        candidates: &[PathBuf],
        selector: &mut dyn Selector,
        console: &mut Console<'_>,
    ) -> LedgerResult<Option<PathBuf>> {
        if candidates.is_empty() {
            return Err(LedgerError::NoCandidates(self.root.clone()));
        }

        let labels: Vec<String> = candidates
            .iter()
            .map(|path| {
                path.strip_prefix(&self.root)
                    .unwrap_or(path)
                    .display()
                    .to_string()
            })
            .collect();

        let choice = selector.choose("Receipt:", &labels, console)?;
        Ok(choice.and_then(|i| candidates.get(i).cloned()))
    }

    /// Ask for a query, search, and let the user pick a file
    pub fn find(
        &self,
        selector: &mut dyn Selector,
        console: &mut Console<'_>,
    ) -> LedgerResult<Option<PathBuf>> {
        let query = console.ask(&format!(
            "Search {} for (blank for all receipts): ",
            self.root.display()
        ))?;
        let candidates: Vec<PathBuf> = self.search(Some(query.as_str())).iter().collect();
        self.choose(&candidates, selector, console)
    }
}
