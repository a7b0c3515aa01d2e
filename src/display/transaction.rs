//! Transaction display formatting
//!
//! One-line labels for selection lists, a detail block for a single
//! transaction and a table for the whole ledger.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Item, Ledger, Transaction, TIMESTAMP_DISPLAY};

/// One line per transaction, used as selection labels
pub fn format_transaction_line(txn: &Transaction) -> String {
    let mut line = format!(
        "{}, {}, [{}]",
        txn.timestamp.format(TIMESTAMP_DISPLAY),
        txn.description,
        txn.item_names().join(", ")
    );
    if !txn.address.is_empty() {
        line.push_str(", ");
        line.push_str(&txn.address);
    }
    line
}

/// Selection labels for every transaction, in ledger order and numbered so
/// identical transactions stay distinguishable
pub fn transaction_labels(ledger: &Ledger) -> Vec<String> {
    ledger
        .transactions
        .iter()
        .enumerate()
        .map(|(i, txn)| format!("#{} {}", i + 1, format_transaction_line(txn)))
        .collect()
}

/// A single item, e.g. `Latte, -$4.50, x2, Tags: drinks`
pub fn format_item(item: &Item, currency: &str) -> String {
    let mut line = format!(
        "{}, {}, x{}",
        item.name,
        item.price.format_with_symbol(currency),
        item.quantity
    );
    if !item.tags.is_empty() {
        line.push_str(&format!(", Tags: {}", item.tags.join(", ")));
    }
    line
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.timestamp.format(TIMESTAMP_DISPLAY)));
    output.push_str(&format!("Description: {}\n", txn.description));

    if !txn.address.is_empty() {
        output.push_str(&format!("Address:     {}\n", txn.address));
    }
    if !txn.payment_method.is_empty() {
        output.push_str(&format!("Payment:     {}\n", txn.payment_method));
    }

    output.push_str(&format!(
        "Receipt:     {}\n",
        txn.receipt_path.as_deref().unwrap_or("(none)")
    ));

    if txn.items.is_empty() {
        output.push_str("Items:       (none)\n");
    } else {
        output.push_str("Items:\n");
        for (i, item) in txn.items.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, format_item(item, currency)));
        }
    }
    output.push_str(&format!(
        "Total:       {}\n",
        txn.total().format_with_symbol(currency)
    ));

    output
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Receipt")]
    receipt: String,
}

/// Format the whole ledger as a table
pub fn format_ledger_table(ledger: &Ledger, currency: &str) -> String {
    if ledger.is_empty() {
        return "No transactions in the ledger.\n".to_string();
    }

    let rows = ledger.transactions.iter().enumerate().map(|(i, txn)| TransactionRow {
        index: i + 1,
        date: txn.timestamp.format(TIMESTAMP_DISPLAY).to_string(),
        description: truncate(&txn.description, 30),
        items: truncate(&txn.item_names().join(", "), 30),
        total: txn.total().format_with_symbol(currency),
        receipt: if txn.has_receipt() { "yes" } else { "" }.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let grand_total = ledger
        .transactions
        .iter()
        .map(Transaction::total)
        .sum::<crate::models::Money>();

    format!(
        "{}\n{} transaction(s), total {}\n",
        table,
        ledger.len(),
        grand_total.format_with_symbol(currency)
    )
}

/// Truncate on a character boundary, marking the cut with "..."
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
