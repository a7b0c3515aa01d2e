//! Transaction model
//!
//! A transaction is one purchase or income event: what it was, the items
//! involved, where and when it happened, how it was paid and an optional
//! receipt copy kept in the receipts directory.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Formats accepted when reading a timestamp typed by the user
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Format used when showing a timestamp back to the user
pub const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M";

/// A single line on a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord")]
pub struct Item {
    pub name: String,

    /// Unit price; negative when the money went out
    pub price: Money,

    pub quantity: u32,

    pub tags: Vec<String>,
}

/// On-disk item shape; bare strings are read as a named item
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRecord {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        price: Money,
        #[serde(default = "default_quantity")]
        quantity: u32,
        #[serde(default)]
        tags: Vec<String>,
    },
}

fn default_quantity() -> u32 {
    1
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        match record {
            ItemRecord::Name(name) => Item::named(name),
            ItemRecord::Full {
                name,
                price,
                quantity,
                tags,
            } => Item {
                name,
                price,
                quantity,
                tags,
            },
        }
    }
}

impl Item {
    /// An item with no price and a quantity of one
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Money::zero(),
            quantity: 1,
            tags: Vec::new(),
        }
    }

    pub fn with_price(mut self, price: Money, quantity: u32) -> Self {
        self.price = price;
        self.quantity = quantity;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Price multiplied by quantity
    pub fn subtotal(&self) -> Money {
        self.price.times(self.quantity)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation("Item name cannot be empty".into()));
        }
        if self.quantity == 0 {
            return Err(LedgerError::Validation(format!(
                "Quantity of '{}' must be a positive integer",
                self.name
            )));
        }
        Ok(())
    }
}

/// Free-text fields whose earlier values can be offered again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Description,
    Address,
    PaymentMethod,
    ItemName,
    Tag,
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TextField::Description => "descriptions",
            TextField::Address => "addresses",
            TextField::PaymentMethod => "payment methods",
            TextField::ItemName => "item names",
            TextField::Tag => "tags",
        };
        f.write_str(name)
    }
}

/// A recorded financial event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned at creation and never changed
    pub id: TransactionId,

    pub description: String,

    #[serde(default)]
    pub items: Vec<Item>,

    /// Free-text location, may be empty
    #[serde(default)]
    pub address: String,

    pub timestamp: NaiveDateTime,

    /// Free-text payment method, may be empty
    #[serde(default)]
    pub payment_method: String,

    /// Receipt file name relative to the receipts directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,
}

impl Transaction {
    /// Create a new transaction with a fresh id and no details
    pub fn new(description: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            id: TransactionId::new(),
            description: description.into(),
            items: Vec::new(),
            address: String::new(),
            timestamp,
            payment_method: String::new(),
            receipt_path: None,
        }
    }

    /// Sum of every item's price times quantity
    pub fn total(&self) -> Money {
        self.items.iter().map(Item::subtotal).sum()
    }

    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt_path.is_some()
    }

    /// The values this transaction holds for `field`, blanks included
    pub fn field_values(&self, field: TextField) -> Vec<&str> {
        match field {
            TextField::Description => vec![self.description.as_str()],
            TextField::Address => vec![self.address.as_str()],
            TextField::PaymentMethod => vec![self.payment_method.as_str()],
            TextField::ItemName => self.item_names(),
            TextField::Tag => self
                .items
                .iter()
                .flat_map(|item| item.tags.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Case-insensitive match against the text fields, items and tags
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let hit = |text: &str| text.to_lowercase().contains(&query);
        hit(&self.description)
            || hit(&self.address)
            || hit(&self.payment_method)
            || self
                .items
                .iter()
                .any(|item| hit(&item.name) || item.tags.iter().any(|tag| hit(tag)))
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::Validation("Description cannot be empty".into()));
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }
}

/// Parse a timestamp typed by the user
///
/// A bare date means midnight of that day.
pub fn parse_timestamp(input: &str) -> LedgerResult<NaiveDateTime> {
    let input = input.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            LedgerError::Validation(format!(
                "'{}' is not a valid date/time (expected YYYY-MM-DD HH:MM)",
                input
            ))
        })
}
