//! # Money Module
//!
//! Provides the `Money` type for prices, line subtotals and order totals.
//!
//! Amounts are whole cents in an `i64`. `"3.50"` is parsed straight to 350
//! cents, so line subtotals and order totals add up exactly, and display
//! always shows two decimals.
//!
//! ## Usage
//! ```rust
//! use bakery_core::money::Money;
//!
//! let price: Money = "3.50".parse().unwrap();
//! assert_eq!(price.cents(), 350);
//!
//! let subtotal = price * 50;
//! assert_eq!(subtotal.to_string(), "$175.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed, so differences can go below zero. Serializes as the bare cent
/// count.
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► OrderLine.unit_price (snapshot) ──► OrderLine::subtotal()
///                                                            │
///                                                            ▼
///                                   Order::total() ──► SalesSummary values
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use bakery_core::money::Money;
    ///
    /// let price = Money::from_cents(5000); // 50.00
    /// assert_eq!(price.cents(), 5000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn whole(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bakery_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5000); // 50.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 15000); // 150.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Renders the amount as a plain two-decimal number without symbol,
    /// e.g. `"-5.50"`, for column layouts.
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.whole().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text into cents without going through floating point.
///
/// ## Accepted Forms
/// ```text
/// "50"      → 5000      "3.5"   → 350
/// "3.50"    → 350       "$8.00" → 800
/// "-2.25"   → -225      " 7.1 " → 710
/// ```
///
/// More than two decimal places is rejected rather than rounded.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

        if unsigned.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (whole_text, frac_text) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        if whole_text.is_empty() && frac_text.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole_text.chars().all(|c| c.is_ascii_digit())
            || !frac_text.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("not a number"));
        }
        if frac_text.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let whole: i64 = if whole_text.is_empty() {
            0
        } else {
            whole_text.parse().map_err(|_| invalid("amount too large"))?
        };
        let frac: i64 = match frac_text.len() {
            0 => 0,
            1 => frac_text.parse::<i64>().map_err(|_| invalid("not a number"))? * 10,
            _ => frac_text.parse().map_err(|_| invalid("not a number"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Fixed two-decimal display with a `$` sign, e.g. `$150.00`, `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.whole().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing subtotals into a total; an empty iterator sums to zero.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.whole(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(15000).to_string(), "$150.00");
        assert_eq!(Money::from_cents(350).to_string(), "$3.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(-50).to_string(), "-$0.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_cents(-550).to_plain_string(), "-5.50");
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!("50".parse::<Money>().unwrap().cents(), 5000);
        assert_eq!("50.0".parse::<Money>().unwrap().cents(), 5000);
        assert_eq!("3.5".parse::<Money>().unwrap().cents(), 350);
        assert_eq!("3.50".parse::<Money>().unwrap().cents(), 350);
        assert_eq!(" $8.00 ".parse::<Money>().unwrap().cents(), 800);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-2.25".parse::<Money>().unwrap().cents(), -225);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "   ", "abc", "1.234", "1,50", "1.2.3", ".", "-", "$", "12a"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_parse_overflow_is_an_error() {
        let err = "99999999999999999999".parse::<Money>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_cents(10000), Money::from_cents(3000)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 13000);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(5000);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 15000);
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(350)).unwrap();
        assert_eq!(json, "350");
    }
}
