//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Transaction, TransactionId};

/// Kinds of ledger mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// One recorded change to the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the change was saved (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub transaction_id: TransactionId,

    /// Transaction description at the time of the change
    pub description: String,

    /// The transaction before the change (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// The transaction after the change (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Top-level fields that differ between before and after
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<String>,
}

impl AuditEntry {
    pub fn created(txn: &Transaction) -> Self {
        Self::new(Operation::Create, txn, None, serde_json::to_value(txn).ok())
    }

    pub fn updated(before: &Transaction, after: &Transaction) -> Self {
        let before_value = serde_json::to_value(before).ok();
        let after_value = serde_json::to_value(after).ok();
        let mut entry = Self::new(Operation::Update, after, before_value, after_value);
        entry.changed_fields = match (&entry.before, &entry.after) {
            (Some(b), Some(a)) => changed_fields(b, a),
            _ => Vec::new(),
        };
        entry
    }

    pub fn deleted(txn: &Transaction) -> Self {
        Self::new(Operation::Delete, txn, serde_json::to_value(txn).ok(), None)
    }

    fn new(
        operation: Operation,
        txn: &Transaction,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            transaction_id: txn.id,
            description: txn.description.clone(),
            before,
            after,
            changed_fields: Vec::new(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.transaction_id,
            self.description
        );
        if !self.changed_fields.is_empty() {
            output.push_str(&format!("\n  Changed: {}", self.changed_fields.join(", ")));
        }
        output
    }
}

/// Names of top-level keys whose values differ, in sorted order
fn changed_fields(before: &Value, after: &Value) -> Vec<String> {
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        return Vec::new();
    };

    let mut fields: Vec<String> = before
        .keys()
        .chain(after.keys())
        .filter(|key| before.get(*key) != after.get(*key))
        .cloned()
        .collect();
    fields.sort();
    fields.dedup();
    fields
}
