//! # Discount Codes
//!
//! A discount descriptor is what the discount-validation endpoint returns for
//! a code the shopper typed. The client trusts it for the rest of the checkout
//! session and never persists it.
//!
//! ```text
//! percent  SAVE10 (value 10) on $100.00 ──► $10.00 off
//! fixed    TAKE5  (value 5)  on $100.00 ──► $5.00 off
//! fixed    TAKE5  (value 5)  on $3.00   ──► $3.00 off (capped at subtotal)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{validate_discount, ValidationResult};

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` percent of the subtotal.
    Percent,
    /// A flat `value` in dollars.
    Fixed,
}

/// A validated discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountDescriptor {
    pub code: String,

    pub kind: DiscountKind,

    /// Percent (0-100) for `Percent`, dollars for `Fixed`.
    #[ts(type = "string")]
    pub value: Decimal,
}

impl DiscountDescriptor {
    /// Creates a percent-off descriptor.
    pub fn percent(code: impl Into<String>, value: Decimal) -> Self {
        DiscountDescriptor {
            code: code.into(),
            kind: DiscountKind::Percent,
            value,
        }
    }

    /// Creates a flat dollar-off descriptor.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        DiscountDescriptor {
            code: code.into(),
            kind: DiscountKind::Fixed,
            value: amount.amount(),
        }
    }

    /// Checks code, sign and the percent range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_discount(self)
    }

    /// The discount as computed by the formula, before any capping.
    ///
    /// A fixed discount larger than the subtotal yields more than the
    /// subtotal here; [`DiscountDescriptor::amount_for`] caps it.
    pub fn raw_amount(&self, subtotal: Money) -> Money {
        match self.kind {
            DiscountKind::Percent => {
                Money::from_dollars(subtotal.amount() * self.value / Decimal::ONE_HUNDRED)
            }
            DiscountKind::Fixed => Money::from_dollars(self.value),
        }
    }

    /// The discount applied to `subtotal`, within `0..=subtotal`.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        let subtotal = subtotal.clamp_non_negative();
        self.raw_amount(subtotal).clamp_non_negative().min(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_discount() {
        let save10 = DiscountDescriptor::percent("SAVE10", dec!(10));
        assert_eq!(
            save10.amount_for(Money::from_cents(10000)),
            Money::from_cents(1000)
        );
    }

    #[test]
    fn test_fixed_discount() {
        let take5 = DiscountDescriptor::fixed("TAKE5", Money::from_cents(500));
        assert_eq!(
            take5.amount_for(Money::from_cents(10000)),
            Money::from_cents(500)
        );
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let take50 = DiscountDescriptor::fixed("TAKE50", Money::from_cents(5000));
        let subtotal = Money::from_cents(300);

        assert_eq!(take50.raw_amount(subtotal), Money::from_cents(5000));
        assert_eq!(take50.amount_for(subtotal), subtotal);
    }

    #[test]
    fn test_deserialize_descriptor() {
        let json = r#"{"code":"TAKE5","kind":"fixed","value":"5.00"}"#;
        let descriptor: DiscountDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.kind, DiscountKind::Fixed);
    }

    #[test]
    fn test_validate_rejects_percent_over_100() {
        let bad = DiscountDescriptor::percent("HUGE", dec!(150));
        assert!(bad.validate().is_err());
    }
}
