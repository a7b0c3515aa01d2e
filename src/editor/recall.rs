//! Reusing values from earlier transactions
//!
//! Prompts that accept it treat an answer of `s` as a request to pick one of
//! the distinct values the ledger already holds for that field, most recent
//! first.

use crate::console::Console;
use crate::error::LedgerResult;
use crate::finder::Selector;
use crate::models::{Ledger, TextField};

/// Answer that opens the list of earlier values
const REUSE_KEY: &str = "s";

/// Earlier ledger values and the selector used to pick among them
pub struct Recall<'a> {
    history: &'a Ledger,
    selector: &'a mut dyn Selector,
}

impl<'a> Recall<'a> {
    pub fn new(history: &'a Ledger, selector: &'a mut dyn Selector) -> Self {
        Self { history, selector }
    }

    /// The selector, for other choices made in the same session
    pub fn selector(&mut self) -> &mut dyn Selector {
        &mut *self.selector
    }

    /// Pick one of the earlier values of `field`
    ///
    /// Returns `None` when there is nothing to reuse or the pick is cancelled.
    pub fn pick(&mut self, field: TextField, console: &mut Console<'_>) -> LedgerResult<Option<String>> {
        let values = self.history.distinct_values(field);
        if values.is_empty() {
            console.warn(&format!("No earlier {} to reuse.", field))?;
            return Ok(None);
        }

        let choice = self.selector.choose("Reuse:", &values, console)?;
        Ok(choice.and_then(|i| values.get(i).cloned()))
    }

    /// Ask at `prompt`, answering `s` with a picked earlier value
    ///
    /// A cancelled pick asks again.
    pub fn ask(&mut self, console: &mut Console<'_>, field: TextField, prompt: &str) -> LedgerResult<String> {
        loop {
            let answer = console.ask(prompt)?;
            if answer != REUSE_KEY {
                return Ok(answer);
            }
            if let Some(value) = self.pick(field, console)? {
                return Ok(value);
            }
        }
    }

    /// Ask with the current value shown; blank keeps it (`None`)
    pub fn ask_with_current(
        &mut self,
        console: &mut Console<'_>,
        field: TextField,
        label: &str,
        current: &str,
    ) -> LedgerResult<Option<String>> {
        let answer = self.ask(console, field, &format!("{} [{}]: ", label, current))?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}
