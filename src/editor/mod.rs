//! Transaction editor
//!
//! Interactive flows that fill in a new transaction or revise an existing
//! one. The editor never touches the disk: it returns a `Draft` holding the
//! edited transaction and the requested receipt change, and the caller
//! applies both. A draft is only returned once the user has seen it and
//! agreed to save it.

pub mod items;
pub mod recall;

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::console::Console;
use crate::display::{format_item, format_transaction_details};
use crate::error::{LedgerError, LedgerResult};
use crate::finder::{ReceiptFinder, Selector};
use crate::models::{parse_timestamp, Ledger, TextField, Transaction, TIMESTAMP_DISPLAY};

pub use items::{parse_tags, prompt_items};
pub use recall::Recall;

/// What should happen to a transaction's receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptChange {
    Keep,
    /// Copy this file in as the transaction's receipt
    Attach(PathBuf),
    /// Remove the current receipt
    Detach,
}

enum ReceiptAction {
    Keep,
    Attach,
    Detach,
}

/// Result of an editing session, not yet persisted
#[derive(Debug, Clone)]
pub struct Draft {
    pub transaction: Transaction,
    pub receipt: ReceiptChange,
}

impl Draft {
    /// Whether saving would leave `existing` as it is
    pub fn is_unchanged(&self, existing: &Transaction) -> bool {
        self.transaction == *existing && self.receipt == ReceiptChange::Keep
    }

    /// The transaction as it will be saved, an attached receipt shown by its
    /// source path
    pub fn preview(&self) -> Transaction {
        let mut txn = self.transaction.clone();
        match &self.receipt {
            ReceiptChange::Keep => {}
            ReceiptChange::Attach(source) => txn.receipt_path = Some(source.display().to_string()),
            ReceiptChange::Detach => txn.receipt_path = None,
        }
        txn
    }
}

/// Prompts for transaction fields
pub struct TransactionEditor<'a> {
    finder: &'a ReceiptFinder,
    recall: Recall<'a>,
    currency: &'a str,
}

impl<'a> TransactionEditor<'a> {
    /// `history` supplies the earlier values offered at reusable prompts
    pub fn new(
        finder: &'a ReceiptFinder,
        selector: &'a mut dyn Selector,
        history: &'a Ledger,
        currency: &'a str,
    ) -> Self {
        Self {
            finder,
            recall: Recall::new(history, selector),
            currency,
        }
    }

    /// Collect every field of a new transaction
    pub fn create(&mut self, console: &mut Console<'_>) -> LedgerResult<Draft> {
        let description = loop {
            let answer =
                self.recall
                    .ask(console, TextField::Description, "Description (s to reuse): ")?;
            if !answer.is_empty() {
                break answer;
            }
            console.error("Description cannot be empty.")?;
        };

        console.say("Items:")?;
        let items = prompt_items(console, &mut self.recall)?;

        let address = self
            .recall
            .ask(console, TextField::Address, "Address (optional, s to reuse): ")?;

        let timestamp = console.ask_until(
            "Timestamp (YYYY-MM-DD HH:MM, blank for now): ",
            |answer| {
                if answer.is_empty() {
                    Ok(now())
                } else {
                    parse_timestamp(answer)
                }
            },
        )?;

        let payment_method = self.recall.ask(
            console,
            TextField::PaymentMethod,
            "Payment method (optional, s to reuse): ",
        )?;

        let mut transaction = Transaction::new(description, timestamp);
        transaction.items = items;
        transaction.address = address;
        transaction.payment_method = payment_method;
        transaction.validate()?;

        let receipt = self.prompt_receipt(None, console)?;

        let draft = Draft {
            transaction,
            receipt,
        };
        self.confirm_save(&draft, console)?;
        Ok(draft)
    }

    /// Revise an existing transaction
    ///
    /// Every prompt shows the current value; blank input keeps it, and `-`
    /// clears an optional text field. The id never changes. A draft with no
    /// changes is returned without asking to save.
    pub fn edit(&mut self, existing: &Transaction, console: &mut Console<'_>) -> LedgerResult<Draft> {
        let mut transaction = existing.clone();

        if let Some(description) = self.recall.ask_with_current(
            console,
            TextField::Description,
            "Description (s to reuse)",
            &existing.description,
        )? {
            transaction.description = description;
        }

        for item in &existing.items {
            console.say(&format!("  - {}", format_item(item, self.currency)))?;
        }
        let replace_items = console.ask_until(
            &format!(
                "Items [{}] (blank to keep, r to re-enter): ",
                existing.item_names().join(", ")
            ),
            |answer| match answer.to_lowercase().as_str() {
                "" => Ok(false),
                "r" => Ok(true),
                _ => Err(LedgerError::Validation("Enter r or leave blank.".into())),
            },
        )?;
        if replace_items {
            transaction.items = prompt_items(console, &mut self.recall)?;
        }

        if let Some(address) =
            self.ask_optional_text(console, TextField::Address, "Address", &existing.address)?
        {
            transaction.address = address;
        }

        let current = existing.timestamp.format(TIMESTAMP_DISPLAY).to_string();
        if let Some(timestamp) = console.ask_until(
            &format!("Timestamp [{}]: ", current),
            |answer| {
                if answer.is_empty() {
                    Ok(None)
                } else {
                    parse_timestamp(answer).map(Some)
                }
            },
        )? {
            transaction.timestamp = timestamp;
        }

        if let Some(payment) = self.ask_optional_text(
            console,
            TextField::PaymentMethod,
            "Payment method",
            &existing.payment_method,
        )? {
            transaction.payment_method = payment;
        }

        transaction.validate()?;

        let receipt = self.prompt_receipt(existing.receipt_path.as_deref(), console)?;

        let draft = Draft {
            transaction,
            receipt,
        };
        if !draft.is_unchanged(existing) {
            self.confirm_save(&draft, console)?;
        }
        Ok(draft)
    }

    /// Show the draft and ask to save it; declining cancels the command
    fn confirm_save(&self, draft: &Draft, console: &mut Console<'_>) -> LedgerResult<()> {
        console.say(&format_transaction_details(&draft.preview(), self.currency))?;
        if console.confirm("Save this transaction?")? {
            Ok(())
        } else {
            Err(LedgerError::Cancelled)
        }
    }

    /// Optional free-text field: blank keeps, `-` clears
    fn ask_optional_text(
        &mut self,
        console: &mut Console<'_>,
        field: TextField,
        label: &str,
        current: &str,
    ) -> LedgerResult<Option<String>> {
        Ok(self
            .recall
            .ask_with_current(console, field, &format!("{} (- to clear, s to reuse)", label), current)?
            .map(|answer| if answer == "-" { String::new() } else { answer }))
    }

    /// Ask what to do about the receipt, running the finder when attaching
    ///
    /// Finding nothing or cancelling the selection leaves the receipt as it
    /// was; only the receipt step is abandoned.
    fn prompt_receipt(
        &mut self,
        current: Option<&str>,
        console: &mut Console<'_>,
    ) -> LedgerResult<ReceiptChange> {
        let prompt = match current {
            Some(path) => format!("Receipt [{}] (blank to keep, a to attach a new one, d to remove): ", path),
            None => "Receipt [none] (blank for none, a to attach): ".to_string(),
        };
        let has_receipt = current.is_some();

        let action = console.ask_until(&prompt, |answer| match answer.to_lowercase().as_str() {
            "" => Ok(ReceiptAction::Keep),
            "a" => Ok(ReceiptAction::Attach),
            "d" if has_receipt => Ok(ReceiptAction::Detach),
            _ => Err(LedgerError::Validation(if has_receipt {
                "Enter a, d or leave blank.".into()
            } else {
                "Enter a or leave blank.".into()
            })),
        })?;

        match action {
            ReceiptAction::Keep => return Ok(ReceiptChange::Keep),
            ReceiptAction::Detach => return Ok(ReceiptChange::Detach),
            ReceiptAction::Attach => {}
        }

        match self.finder.find(self.recall.selector(), console) {
            Ok(Some(path)) => Ok(ReceiptChange::Attach(path)),
            Ok(None) => {
                console.say("No receipt selected.")?;
                Ok(ReceiptChange::Keep)
            }
            Err(e @ LedgerError::NoCandidates(_)) => {
                console.error(&e.to_string())?;
                Ok(ReceiptChange::Keep)
            }
            Err(e) => Err(e),
        }
    }
}

/// Current local time to the second
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
