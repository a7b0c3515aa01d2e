//! Money type for item prices
//!
//! Amounts are whole cents in an i64, so totals never pick up floating-point
//! drift. Negative amounts are money going out. Arithmetic saturates at the
//! i64 bounds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg};

use crate::error::{LedgerError, LedgerResult};

/// A monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply by an item quantity
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Parse an amount such as "10.50", "$3", "-4.5" or "0.99"
    ///
    /// At most two decimal places are accepted.
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let invalid = || LedgerError::Validation(format!("'{}' is not a valid amount", input.trim()));

        let s = input.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);

        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > 2
        {
            return Err(invalid());
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol, sign in front of the symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-5).format_with_symbol("€"), "-€0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse(".99").unwrap().cents(), 99);
        assert_eq!(Money::parse("-4.25").unwrap().cents(), -425);
        assert_eq!(Money::parse(" 3. ").unwrap().cents(), 300);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("$").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_times_and_sum() {
        let price = Money::from_cents(250);
        assert_eq!(price.times(3).cents(), 750);

        let total: Money = vec![price.times(2), -Money::from_cents(100)].into_iter().sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let largest = Money::parse("92233720368547758.07").unwrap();
        assert_eq!(largest.cents(), i64::MAX);

        let total: Money = vec![largest, largest].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!((-largest + -largest).cents(), i64::MIN);
        assert_eq!((-(-largest + -largest)).cents(), i64::MAX);
        assert_eq!(largest.times(3).cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN).format_with_symbol("$"), "-$92233720368547758.08");
    }
}
