//! Interactive menu shell
//!
//! The shell owns the loaded ledger and runs the main menu loop. Each
//! mutating command builds the next ledger state, saves it, and only then
//! replaces the in-memory copy, so a failed save leaves both the file and the
//! shell's view unchanged. Recoverable errors are reported and the loop goes
//! on; end of input at the menu exits.

pub mod menu;

use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::console::Console;
use crate::display::{format_ledger_table, format_transaction_details, transaction_labels};
use crate::editor::{Draft, ReceiptChange, TransactionEditor};
use crate::error::{LedgerError, LedgerResult};
use crate::finder::{page, ReceiptFinder, Selector};
use crate::models::{Ledger, Transaction, TransactionId};
use crate::receipts::{ReceiptStore, StagedReceipt};
use crate::storage::LedgerStore;

pub use menu::{format_menu, MenuOperation};

/// Consecutive unreadable menu answers before the loop stops
const MAX_INPUT_ERRORS: usize = 5;

/// Outcome of removing a receipt file alongside a ledger change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptCleanup {
    /// Nothing to remove
    None,
    Removed,
    /// The file was already gone
    Missing,
}

/// The running menu session
pub struct Shell {
    store: LedgerStore,
    ledger: Ledger,
    receipts: ReceiptStore,
    finder: ReceiptFinder,
    selector: Box<dyn Selector>,
    pager: Option<String>,
    currency: String,
    audit: Option<AuditLogger>,
}

impl Shell {
    pub fn new(
        store: LedgerStore,
        ledger: Ledger,
        receipts: ReceiptStore,
        finder: ReceiptFinder,
        selector: Box<dyn Selector>,
    ) -> Self {
        Self {
            store,
            ledger,
            receipts,
            finder,
            selector,
            pager: None,
            currency: "$".to_string(),
            audit: None,
        }
    }

    pub fn with_pager(mut self, pager: Option<String>) -> Self {
        self.pager = pager;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_audit(mut self, audit: Option<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run the main menu until quit or end of input
    ///
    /// An unreadable answer is reported and the prompt repeats; the loop
    /// gives up after `MAX_INPUT_ERRORS` of them in a row.
    pub fn run(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        console.say(&format_menu())?;
        let mut input_errors = 0;

        loop {
            let answer = match console.ask("Command (c for commands): ") {
                Ok(answer) => answer,
                Err(LedgerError::Cancelled) => return Ok(()),
                Err(e) if e.is_fatal() || input_errors + 1 >= MAX_INPUT_ERRORS => return Err(e),
                Err(e) => {
                    input_errors += 1;
                    console.error(&e.to_string())?;
                    continue;
                }
            };
            input_errors = 0;

            let Some(operation) = MenuOperation::from_input(&answer) else {
                if !answer.is_empty() {
                    console.error(&format!("Unknown command '{}'.", answer))?;
                }
                continue;
            };

            if operation == MenuOperation::Quit {
                return Ok(());
            }

            match self.dispatch(operation, console) {
                Ok(()) => {}
                Err(LedgerError::Cancelled) => console.say("Cancelled.")?,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => console.error(&e.to_string())?,
            }
        }
    }

    /// Run one menu command
    pub fn dispatch(&mut self, operation: MenuOperation, console: &mut Console<'_>) -> LedgerResult<()> {
        match operation {
            MenuOperation::Add => self.add(console),
            MenuOperation::Edit => self.edit(console),
            MenuOperation::Delete => self.delete(console),
            MenuOperation::List => self.list(console),
            MenuOperation::Search => self.search(console),
            MenuOperation::History => self.history(console),
            MenuOperation::Help => console.say(&format_menu()),
            MenuOperation::Quit => Ok(()),
        }
    }

    fn add(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        let draft = TransactionEditor::new(
            &self.finder,
            self.selector.as_mut(),
            &self.ledger,
            &self.currency,
        )
        .create(console)?;
        self.apply_new(draft)?;
        console.say("Transaction saved.")
    }

    fn edit(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        let Some(existing) = self.pick_transaction("Edit:", None, console)? else {
            return Ok(());
        };

        let draft = TransactionEditor::new(
            &self.finder,
            self.selector.as_mut(),
            &self.ledger,
            &self.currency,
        )
        .edit(&existing, console)?;

        if draft.is_unchanged(&existing) {
            return console.say("No changes.");
        }

        let (_, cleanup) = self.apply_edit(&existing, draft)?;
        if cleanup == ReceiptCleanup::Missing {
            console.warn("The receipt file was not found.")?;
        }
        console.say("Transaction saved.")
    }

    fn delete(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        let Some(existing) = self.pick_transaction("Remove:", None, console)? else {
            return Ok(());
        };

        console.say(&format_transaction_details(&existing, &self.currency))?;
        if !console.confirm("Remove this transaction?")? {
            return console.say("Transaction kept.");
        }

        let (_, cleanup) = self.apply_delete(existing.id)?;
        if cleanup == ReceiptCleanup::Missing {
            console.warn("The receipt file was not found.")?;
        }
        console.say("Transaction removed.")
    }

    fn list(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        if self.ledger.is_empty() {
            return console.warn("No transactions in the ledger.");
        }
        let table = format_ledger_table(&self.ledger, &self.currency);
        page(&table, self.pager.as_deref(), console.output())
    }

    fn search(&mut self, console: &mut Console<'_>) -> LedgerResult<()> {
        if self.ledger.is_empty() {
            return console.warn("No transactions in the ledger.");
        }

        let query = console.ask("Search for (blank for all): ")?;
        let hits: Vec<TransactionId> = self.ledger.search(&query).map(|t| t.id).collect();
        if hits.is_empty() {
            return console.say("No matching transactions.");
        }

        if let Some(txn) = self.pick_transaction("Show:", Some(hits.as_slice()), console)? {
            console.say(&format_transaction_details(&txn, &self.currency))?;
        }
        Ok(())
    }

    /// Page through the audit log, oldest change first
    fn history(&self, console: &mut Console<'_>) -> LedgerResult<()> {
        let Some(audit) = &self.audit else {
            return console.warn("The audit log is not enabled.");
        };

        let entries = audit.read_all()?;
        if entries.is_empty() {
            return console.say("No changes recorded.");
        }

        let mut text = format!("Changes recorded in {}:\n", audit.path().display());
        for entry in &entries {
            text.push_str(&entry.format_human_readable());
            text.push('\n');
        }
        page(&text, self.pager.as_deref(), console.output())
    }

    /// Let the user choose a transaction, from `subset` when given
    fn pick_transaction(
        &mut self,
        prompt: &str,
        subset: Option<&[TransactionId]>,
        console: &mut Console<'_>,
    ) -> LedgerResult<Option<Transaction>> {
        if self.ledger.is_empty() {
            console.warn("No transactions in the ledger.")?;
            return Ok(None);
        }

        let (ids, labels): (Vec<TransactionId>, Vec<String>) = self
            .ledger
            .transactions
            .iter()
            .zip(transaction_labels(&self.ledger))
            .filter(|(t, _)| subset.map_or(true, |ids| ids.contains(&t.id)))
            .map(|(t, label)| (t.id, label))
            .unzip();

        let choice = self.selector.choose(prompt, &labels, console)?;
        Ok(choice
            .and_then(|i| ids.get(i))
            .and_then(|id| self.ledger.get(*id))
            .cloned())
    }

    /// Persist a new transaction, copying its receipt first
    ///
    /// The receipt is copied under a staging name and only takes its final
    /// name once the ledger is saved. A failed copy leaves the ledger
    /// untouched; a failed save removes the staged copy.
    pub fn apply_new(&mut self, draft: Draft) -> LedgerResult<Transaction> {
        let mut txn = draft.transaction;
        txn.validate()?;

        let source = match draft.receipt {
            ReceiptChange::Attach(source) => Some(source),
            ReceiptChange::Keep | ReceiptChange::Detach => None,
        };
        txn.receipt_path = source
            .as_deref()
            .map(|source| ReceiptStore::file_name_for(txn.id, source));

        let mut next = self.ledger.clone();
        next.push(txn.clone())?;
        let staged = source
            .map(|source| self.receipts.stage(&source, txn.id))
            .transpose()?;
        self.commit(next, staged)?;

        info!(id = %txn.id, description = %txn.description, "Added transaction");
        self.record(AuditEntry::created(&txn));
        Ok(txn)
    }

    /// Persist an edited transaction and apply its receipt change
    ///
    /// A new receipt replaces the stored file only after the save, and a
    /// replaced or detached file with another name is deleted right after.
    pub fn apply_edit(
        &mut self,
        existing: &Transaction,
        draft: Draft,
    ) -> LedgerResult<(Transaction, ReceiptCleanup)> {
        let mut txn = draft.transaction;
        if txn.id != existing.id {
            return Err(LedgerError::Validation(
                "A transaction's id cannot change".into(),
            ));
        }
        txn.validate()?;

        let old_receipt = existing.receipt_path.clone();
        let (source, stale) = match draft.receipt {
            ReceiptChange::Keep => {
                txn.receipt_path = old_receipt;
                (None, None)
            }
            ReceiptChange::Detach => {
                txn.receipt_path = None;
                (None, old_receipt)
            }
            ReceiptChange::Attach(source) => {
                let relative = ReceiptStore::file_name_for(txn.id, &source);
                let stale = old_receipt.filter(|old| *old != relative);
                txn.receipt_path = Some(relative);
                (Some(source), stale)
            }
        };

        let mut next = self.ledger.clone();
        next.replace(txn.clone())?;
        let staged = source
            .map(|source| self.receipts.stage(&source, txn.id))
            .transpose()?;
        self.commit(next, staged)?;

        let cleanup = self.remove_receipt(stale.as_deref());
        info!(id = %txn.id, "Updated transaction");
        self.record(AuditEntry::updated(existing, &txn));
        Ok((txn, cleanup))
    }

    /// Remove a transaction and then its receipt file
    pub fn apply_delete(&mut self, id: TransactionId) -> LedgerResult<(Transaction, ReceiptCleanup)> {
        let mut next = self.ledger.clone();
        let removed = next.remove(id)?;
        self.commit(next, None)?;

        let cleanup = self.remove_receipt(removed.receipt_path.as_deref());
        info!(id = %removed.id, "Removed transaction");
        self.record(AuditEntry::deleted(&removed));
        Ok((removed, cleanup))
    }

    /// Save `next`, move its staged receipt into place, and adopt it
    ///
    /// A failed save discards the staged copy. If the receipt cannot be moved
    /// into place the previous ledger is written back, so no saved record
    /// points at a file that never arrived.
    fn commit(&mut self, next: Ledger, staged: Option<StagedReceipt>) -> LedgerResult<()> {
        if let Err(e) = self.store.save(&next) {
            if let Some(staged) = staged {
                self.receipts.discard(staged);
            }
            return Err(e);
        }

        if let Some(staged) = staged {
            if let Err(e) = self.receipts.promote(staged) {
                if let Err(restore) = self.store.save(&self.ledger) {
                    warn!(error = %restore, "Could not restore the previous ledger");
                }
                return Err(e);
            }
        }

        self.ledger = next;
        Ok(())
    }

    fn remove_receipt(&self, relative: Option<&str>) -> ReceiptCleanup {
        let Some(relative) = relative else {
            return ReceiptCleanup::None;
        };
        match self.receipts.detach(relative) {
            Ok(true) => ReceiptCleanup::Removed,
            Ok(false) => ReceiptCleanup::Missing,
            Err(e) => {
                // The ledger is already saved; a leftover file is only clutter
                warn!(receipt = relative, error = %e, "Could not remove receipt");
                ReceiptCleanup::Missing
            }
        }
    }

    fn record(&self, entry: AuditEntry) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                warn!(error = %e, "Failed to write audit entry");
            }
        }
    }
}
