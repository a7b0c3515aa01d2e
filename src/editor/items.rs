//! Item entry
//!
//! Prices are typed as positive amounts and then marked as a gain or a loss.

use super::recall::Recall;
use crate::console::Console;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Item, Money, TextField};

/// Prompt for items until a blank name is entered
pub fn prompt_items(console: &mut Console<'_>, recall: &mut Recall<'_>) -> LedgerResult<Vec<Item>> {
    let mut items = Vec::new();
    loop {
        let name = recall.ask(console, TextField::ItemName, "Item name (blank to finish, s to reuse): ")?;
        if name.is_empty() {
            return Ok(items);
        }
        items.push(prompt_item_details(console, recall, name)?);
    }
}

fn prompt_item_details(
    console: &mut Console<'_>,
    recall: &mut Recall<'_>,
    name: String,
) -> LedgerResult<Item> {
    let amount = console.ask_until("Price (blank for none): ", parse_unsigned_price)?;

    let price = if amount.is_zero() {
        amount
    } else {
        console.ask_until("Gain or loss? (g/l) ", |answer| {
            match answer.to_lowercase().as_str() {
                "g" | "gain" => Ok(amount),
                "l" | "loss" => Ok(-amount),
                _ => Err(LedgerError::Validation("Please answer g or l.".into())),
            }
        })?
    };

    let quantity = console.ask_until("Quantity [1]: ", parse_quantity)?;
    let tags = parse_tags(&recall.ask(console, TextField::Tag, "Tags (comma separated, s to reuse): ")?);

    Ok(Item::named(name).with_price(price, quantity).with_tags(tags))
}

fn parse_unsigned_price(answer: &str) -> LedgerResult<Money> {
    if answer.is_empty() {
        return Ok(Money::zero());
    }
    let price = Money::parse(answer)?;
    if price.is_negative() {
        return Err(LedgerError::Validation(
            "Enter the price as a positive amount.".into(),
        ));
    }
    Ok(price)
}

fn parse_quantity(answer: &str) -> LedgerResult<u32> {
    if answer.is_empty() {
        return Ok(1);
    }
    match answer.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(LedgerError::Validation(
            "Quantity must be a positive integer.".into(),
        )),
    }
}

/// Split a comma separated tag list, dropping blanks and repeats
pub fn parse_tags(answer: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in answer.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
