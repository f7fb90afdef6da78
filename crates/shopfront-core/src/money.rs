//! # Money Module
//!
//! Provides `Money` for dollar amounts and `Credits` for the loyalty currency.
//!
//! ## Why Decimal Dollars?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Checkout needs sub-cent precision too:                                 │
//! │    5% of $0.99 = $0.0495 → 4.95 credits → rounds UP to 5 credits       │
//! │    Integer cents would have lost the fraction before the ceiling.      │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                            │
//! │    Exact base-10 arithmetic, rounding only where a rule says so        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::money::{Credits, Money};
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2;             // $21.98
//! assert_eq!(doubled.to_string(), "$21.98");
//!
//! let balance = Credits::new(2500);
//! assert_eq!(balance.to_string(), "2500 credits");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A dollar amount.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Negative values are representable so a raw
///   `subtotal - discount` can be inspected before clamping
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Serde**: Serialized as a decimal string, deserialized from either a
///   JSON number or a string
///
/// ## Where Money is Used
/// ```text
/// CartLine.unit_price ──► Cart.subtotal ──► SettlementQuote.subtotal
///                                              │
///              shipping quote ──► + shipping   │
///              discount code  ──► - discount   ▼
///              credit payment ──► - 5%     payable_dollars ──► credits
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from an exact decimal dollar amount.
    #[inline]
    pub const fn from_dollars(dollars: Decimal) -> Self {
        Money(dollars)
    }

    /// Creates a Money value from whole cents.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal dollar amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to whole cents (half away from zero).
    ///
    /// Display and wire formats use this; the settlement math does not.
    pub fn round_to_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the amount in whole cents, rounded half away from zero.
    pub fn cents(&self) -> i64 {
        (self.round_to_cents().0 * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns this amount, or zero if it is negative.
    #[inline]
    pub fn clamp_non_negative(self) -> Money {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `bps` basis points of this amount, without rounding.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(20000); // $200.00
    /// assert_eq!(subtotal.percentage_bps(500), Money::from_cents(1000)); // 5%
    /// ```
    pub fn percentage_bps(&self, bps: u32) -> Money {
        Money(self.0 * Decimal::from(bps) / Decimal::from(10_000))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

/// Parses plain decimal strings such as `"12.50"` or `"$12.50"`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        Decimal::from_str(digits)
            .map(Money)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(dollars: Decimal) -> Self {
        Money(dollars)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Credits Type
// =============================================================================

/// A count of store credits.
///
/// Credits are whole units; every conversion from dollars rounds explicitly
/// (see [`crate::credits`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Credits(#[ts(type = "number")] i64);

impl Credits {
    #[inline]
    pub const fn new(value: i64) -> Self {
        Credits(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Credits(0)
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `self - other`, or zero when `other` is larger.
    #[inline]
    pub fn saturating_sub(self, other: Credits) -> Credits {
        Credits(self.0.saturating_sub(other.0).max(0))
    }

    /// Returns `self + other`, clamped at `i64::MAX`.
    #[inline]
    pub fn saturating_add(self, other: Credits) -> Credits {
        Credits(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} credits", self.0)
    }
}

impl Add for Credits {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Credits(self.0 + other.0)
    }
}

impl Sub for Credits {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Credits(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_dollars(dec!(0.005)).to_string(), "$0.01");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = lines.iter().sum();
        assert_eq!(total, Money::from_cents(350));
    }

    #[test]
    fn test_percentage_keeps_sub_cent_precision() {
        let amount = Money::from_cents(99);
        assert_eq!(amount.percentage_bps(500).amount(), dec!(0.0495));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(
            Money::from_cents(10).clamp_non_negative(),
            Money::from_cents(10)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("12.50".parse::<Money>().unwrap(), Money::from_cents(1250));
        assert_eq!("$3".parse::<Money>().unwrap(), Money::from_cents(300));
        assert!("twelve".parse::<Money>().is_err());
    }

    #[test]
    fn test_json_accepts_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("19.99").unwrap();
        let from_string: Money = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(from_number, Money::from_cents(1999));
        assert_eq!(from_string, Money::from_cents(1999));
    }

    #[test]
    fn test_credits_saturating_sub() {
        assert_eq!(
            Credits::new(500).saturating_sub(Credits::new(200)),
            Credits::new(300)
        );
        assert_eq!(
            Credits::new(200).saturating_sub(Credits::new(500)),
            Credits::zero()
        );
    }

    #[test]
    fn test_credits_saturating_add() {
        assert_eq!(
            Credits::new(500).saturating_add(Credits::new(200)),
            Credits::new(700)
        );
        assert_eq!(
            Credits::new(i64::MAX).saturating_add(Credits::new(1)),
            Credits::new(i64::MAX)
        );
    }
}
