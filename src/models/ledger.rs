//! In-memory ledger
//!
//! The ledger is the ordered list of transactions. Insertion order is the
//! display order and is preserved through every save and load.

use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::transaction::{TextField, Transaction};
use crate::error::{LedgerError, LedgerResult};

/// Serialized form of the ledger file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a transaction at the end
    pub fn push(&mut self, transaction: Transaction) -> LedgerResult<()> {
        if self.position(transaction.id).is_some() {
            return Err(LedgerError::Validation(format!(
                "Transaction {} is already in the ledger",
                transaction.id
            )));
        }
        self.transactions.push(transaction);
        Ok(())
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    /// Replace the transaction with the same id, keeping its place
    pub fn replace(&mut self, transaction: Transaction) -> LedgerResult<Transaction> {
        let index = self
            .position(transaction.id)
            .ok_or_else(|| LedgerError::transaction_not_found(transaction.id.to_string()))?;
        Ok(std::mem::replace(&mut self.transactions[index], transaction))
    }

    /// Remove a transaction, returning it
    pub fn remove(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
        Ok(self.transactions.remove(index))
    }

    /// Every receipt path referenced by a live transaction
    pub fn receipt_references(&self) -> impl Iterator<Item = &str> {
        self.transactions
            .iter()
            .filter_map(|t| t.receipt_path.as_deref())
    }

    /// Distinct non-blank values of `field`, most recent transaction first
    pub fn distinct_values(&self, field: TextField) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for txn in self.transactions.iter().rev() {
            for value in txn.field_values(field) {
                let value = value.trim();
                if !value.is_empty() && !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        values
    }

    /// Transactions matching a free-text query, in ledger order
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |t| t.matches(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn txn(description: &str) -> Transaction {
        Transaction::new(description, parse_timestamp("2024-01-05 08:00").unwrap())
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut ledger = Ledger::new();
        for name in ["Rent", "Coffee", "Books"] {
            ledger.push(txn(name)).unwrap();
        }
        let names: Vec<_> = ledger.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Coffee", "Books"]);
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut ledger = Ledger::new();
        let t = txn("Coffee");
        ledger.push(t.clone()).unwrap();
        assert!(ledger.push(t).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut ledger = Ledger::new();
        let first = txn("First");
        let second = txn("Second");
        ledger.push(first.clone()).unwrap();
        ledger.push(second).unwrap();

        let mut edited = first.clone();
        edited.description = "Edited".into();
        let old = ledger.replace(edited).unwrap();

        assert_eq!(old.description, "First");
        assert_eq!(ledger.transactions[0].description, "Edited");
        assert_eq!(ledger.transactions[0].id, first.id);
    }

    #[test]
    fn test_remove_and_missing() {
        let mut ledger = Ledger::new();
        let t = txn("Coffee");
        ledger.push(t.clone()).unwrap();

        let removed = ledger.remove(t.id).unwrap();
        assert_eq!(removed.id, t.id);
        assert!(ledger.is_empty());

        let err = ledger.remove(t.id).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert!(ledger.replace(t).is_err());
    }

    #[test]
    fn test_receipt_references_and_search() {
        let mut ledger = Ledger::new();
        let mut with_receipt = txn("Coffee");
        with_receipt.receipt_path = Some("abc.pdf".into());
        ledger.push(with_receipt).unwrap();
        ledger.push(txn("Bookstore")).unwrap();

        let refs: Vec<_> = ledger.receipt_references().collect();
        assert_eq!(refs, vec!["abc.pdf"]);

        let hits: Vec<_> = ledger.search("book").map(|t| t.description.as_str()).collect();
        assert_eq!(hits, vec!["Bookstore"]);
    }

    #[test]
    fn test_distinct_values_most_recent_first() {
        use crate::models::Item;

        let mut ledger = Ledger::new();
        let mut first = txn("Coffee");
        first.address = "123 Main St".into();
        first.items = vec![Item::named("Latte").with_tags(vec!["drinks".into()])];
        let mut second = txn("Bakery");
        second.items = vec![
            Item::named("Bread").with_tags(vec!["food".into(), "drinks".into()]),
            Item::named("Latte"),
        ];
        let mut third = txn("Coffee");
        third.address = "  ".into();
        for t in [first, second, third] {
            ledger.push(t).unwrap();
        }

        assert_eq!(
            ledger.distinct_values(TextField::Description),
            vec!["Coffee", "Bakery"]
        );
        assert_eq!(ledger.distinct_values(TextField::Address), vec!["123 Main St"]);
        assert_eq!(ledger.distinct_values(TextField::ItemName), vec!["Bread", "Latte"]);
        assert_eq!(ledger.distinct_values(TextField::Tag), vec!["food", "drinks"]);
        assert!(ledger.distinct_values(TextField::PaymentMethod).is_empty());
    }
}
