//! # Credit Conversion
//!
//! Dollar ↔ credit conversion and the loyalty earn rate.
//!
//! ## Two Different Scales
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPENDING credits                 │  EARNING credits                    │
//! │  ─────────────────                │  ───────────────                    │
//! │  $1.00 = 100 credits              │  $1.00 spent = 5 credits earned     │
//! │  rounds UP (never under-charge)   │  rounds DOWN (never over-reward)    │
//! │                                   │                                     │
//! │  $305.00 ──► 30500 credits        │  $300.00 ──► 1500 credits           │
//! │  $0.005  ──► 1 credit             │  $0.19   ──► 0 credits              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative amounts are clamped to zero; `Decimal` has no NaN.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::money::{Credits, Money};
use crate::{CREDITS_PER_DOLLAR, CREDIT_PAYMENT_DISCOUNT_BPS, EARNED_CREDITS_PER_DOLLAR};

/// Converts a dollar amount to the credits needed to pay it.
///
/// `ceil(dollars * 100)`, so a fractional cent always costs a whole credit.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use shopfront_core::{dollars_to_credits, Credits, Money};
///
/// assert_eq!(dollars_to_credits(Money::from_dollars(dec!(0.005))), Credits::new(1));
/// assert_eq!(dollars_to_credits(Money::from_dollars(dec!(1.001))), Credits::new(101));
/// ```
pub fn dollars_to_credits(dollars: Money) -> Credits {
    let dollars = dollars.clamp_non_negative().amount();
    let credits = (dollars * Decimal::from(CREDITS_PER_DOLLAR)).ceil();
    Credits::new(credits.to_i64().unwrap_or(i64::MAX))
}

/// Converts credits to their dollar value at two decimal places.
pub fn credits_to_dollars(credits: Credits) -> Money {
    // CREDITS_PER_DOLLAR is 100, so scale 2 is an exact division
    Money::from_dollars(Decimal::new(credits.value().max(0), 2))
}

/// The incentive for paying with credits: 5% of `amount`, or zero.
///
/// Callers pass the pre-shipping subtotal.
pub fn calculate_credit_discount(amount: Money, paying_with_credits: bool) -> Money {
    if !paying_with_credits {
        return Money::zero();
    }
    amount
        .clamp_non_negative()
        .percentage_bps(CREDIT_PAYMENT_DISCOUNT_BPS)
}

/// Credits earned for a dollar purchase: `floor(total * 5)`.
pub fn calculate_earned_credits(purchase_total: Money) -> Credits {
    let total = purchase_total.clamp_non_negative().amount();
    let earned = (total * Decimal::from(EARNED_CREDITS_PER_DOLLAR)).floor();
    Credits::new(earned.to_i64().unwrap_or(i64::MAX))
}
