//! # Settlement Quote
//!
//! Computes what the checkout screen shows and what the order will charge.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal        = Σ unit_price over every cart line                 │
//! │  2. credit_discount = 5% of subtotal when paying with credits           │
//! │  3. discount_amount = discount code applied to subtotal (capped)        │
//! │  4. payable_dollars = subtotal + shipping − discount − credit_discount  │
//! │                       (never below zero)                                │
//! │  5. payable_credits = ceil(payable_dollars × 100)                       │
//! │  6. shortfall       = payable_credits − balance, when paying credits   │
//! │  7. credits_to_earn = floor(subtotal × 5), when paying dollars          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount code and the credit-payment discount stack. The quote is
//! recomputed from scratch whenever cart, shipping, discount, payment mode or
//! balance change; nothing is patched in place.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::credits::{calculate_credit_discount, calculate_earned_credits, dollars_to_credits};
use crate::discount::DiscountDescriptor;
use crate::error::{CoreError, CoreResult};
use crate::money::{Credits, Money};
use crate::types::{Cart, PaymentMode};
use crate::validation::{validate_discount, validate_shipping_cost, validate_unit_price};

/// The derived pricing for one checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementQuote {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub shipping_cost: Money,
    pub credit_discount: Money,
    pub payable_dollars: Money,
    /// Credits needed to pay `payable_dollars`. Informational when paying in
    /// dollars.
    pub payable_credits: Credits,
    pub credits_to_earn: Credits,
    pub payment_mode: PaymentMode,
    pub credit_balance: Credits,
    /// Present only when paying with credits and the balance falls short.
    pub shortfall: Option<Credits>,
    /// Code of the discount that was applied, if any.
    pub discount_code: Option<String>,
}

impl SettlementQuote {
    /// Returns an error when the quote cannot be paid as chosen.
    pub fn ensure_payable(&self) -> CoreResult<()> {
        match self.shortfall {
            Some(shortfall) => Err(CoreError::InsufficientCredits {
                required: self.payable_credits,
                available: self.credit_balance,
                shortfall,
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn is_payable(&self) -> bool {
        self.shortfall.is_none()
    }

    /// Both discounts combined.
    pub fn total_discount(&self) -> Money {
        self.discount_amount + self.credit_discount
    }

    /// Total sent with the order: dollars, rounded to cents.
    pub fn order_total(&self) -> Money {
        self.payable_dollars.round_to_cents()
    }
}

/// Computes the settlement quote for a checkout.
///
/// ## Arguments
/// * `cart` - Lines in the cart; quantity is repetition
/// * `shipping_cost` - Latest shipping-fee quote
/// * `discount` - Validated discount code, if one is applied
/// * `payment_mode` - Dollars or credits
/// * `credit_balance` - Last known balance (the server stays authoritative)
///
/// ## Errors
/// `CoreError::Validation` when a price, the shipping cost or the discount is
/// malformed. An insufficient balance is not an error here; it is reported in
/// [`SettlementQuote::shortfall`] and enforced by
/// [`SettlementQuote::ensure_payable`].
pub fn compute_settlement(
    cart: &Cart,
    shipping_cost: Money,
    discount: Option<&DiscountDescriptor>,
    payment_mode: PaymentMode,
    credit_balance: Credits,
) -> CoreResult<SettlementQuote> {
    for line in cart.lines() {
        validate_unit_price(line.unit_price)?;
    }
    validate_shipping_cost(shipping_cost)?;
    if let Some(discount) = discount {
        validate_discount(discount)?;
    }

    let paying_with_credits = payment_mode.is_credits();

    let subtotal = cart.subtotal();
    let credit_discount = calculate_credit_discount(subtotal, paying_with_credits);
    let discount_amount = discount
        .map(|d| d.amount_for(subtotal))
        .unwrap_or_default();

    let payable_dollars =
        (subtotal + shipping_cost - discount_amount - credit_discount).clamp_non_negative();
    let payable_credits = dollars_to_credits(payable_dollars);

    let shortfall = if paying_with_credits && credit_balance < payable_credits {
        Some(payable_credits.saturating_sub(credit_balance))
    } else {
        None
    };

    let credits_to_earn = if paying_with_credits {
        Credits::zero()
    } else {
        calculate_earned_credits(subtotal)
    };

    Ok(SettlementQuote {
        subtotal,
        discount_amount,
        shipping_cost,
        credit_discount,
        payable_dollars,
        payable_credits,
        credits_to_earn,
        payment_mode,
        credit_balance,
        shortfall,
        discount_code: discount.map(|d| d.code.clone()),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CartLine;
    use crate::ValidationError;
    use rust_decimal_macros::dec;

    fn cart_of(cents: &[i64]) -> Cart {
        Cart::from_lines(
            cents
                .iter()
                .enumerate()
                .map(|(i, c)| CartLine::new(format!("SKU-{}", i), "Item", Money::from_cents(*c)))
                .collect(),
        )
    }

    fn three_hundred() -> Cart {
        cart_of(&[10000, 15000, 5000])
    }

    #[test]
    fn test_dollar_payment_scenario() {
        let quote = compute_settlement(
            &three_hundred(),
            Money::from_cents(1000),
            None,
            PaymentMode::Dollars,
            Credits::zero(),
        )
        .unwrap();

        assert_eq!(quote.subtotal, Money::from_cents(30000));
        assert_eq!(quote.credit_discount, Money::zero());
        assert_eq!(quote.payable_dollars, Money::from_cents(31000));
        assert_eq!(quote.payable_credits, Credits::new(31000));
        assert_eq!(quote.credits_to_earn, Credits::new(1500));
        assert!(quote.is_payable());
    }

    #[test]
    fn test_credit_payment_with_enough_balance() {
        let quote = compute_settlement(
            &three_hundred(),
            Money::from_cents(1000),
            None,
            PaymentMode::Credits,
            Credits::new(30000),
        )
        .unwrap();

        assert_eq!(quote.credit_discount, Money::from_cents(1500));
        assert_eq!(quote.payable_dollars, Money::from_cents(29500));
        assert_eq!(quote.payable_credits, Credits::new(29500));
        assert_eq!(quote.credits_to_earn, Credits::zero());
        assert!(quote.ensure_payable().is_ok());
    }

    #[test]
    fn test_credit_payment_shortfall_blocks() {
        let quote = compute_settlement(
            &three_hundred(),
            Money::from_cents(1000),
            None,
            PaymentMode::Credits,
            Credits::new(29000),
        )
        .unwrap();

        assert_eq!(quote.shortfall, Some(Credits::new(500)));
        assert_eq!(
            quote.ensure_payable(),
            Err(CoreError::InsufficientCredits {
                required: Credits::new(29500),
                available: Credits::new(29000),
                shortfall: Credits::new(500),
            })
        );
    }

    #[test]
    fn test_dollar_payment_ignores_balance() {
        let quote = compute_settlement(
            &three_hundred(),
            Money::from_cents(1000),
            None,
            PaymentMode::Dollars,
            Credits::zero(),
        )
        .unwrap();

        assert_eq!(quote.shortfall, None);
    }

    #[test]
    fn test_discount_code_stacks_with_credit_discount() {
        let cart = cart_of(&[10000]);
        let save10 = DiscountDescriptor::percent("SAVE10", dec!(10));

        let quote = compute_settlement(
            &cart,
            Money::zero(),
            Some(&save10),
            PaymentMode::Credits,
            Credits::new(100_000),
        )
        .unwrap();

        assert_eq!(quote.discount_amount, Money::from_cents(1000));
        assert_eq!(quote.credit_discount, Money::from_cents(500));
        assert_eq!(quote.total_discount(), Money::from_cents(1500));
        assert_eq!(quote.payable_dollars, Money::from_cents(8500));
        assert_eq!(quote.discount_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn test_oversized_fixed_discount_never_goes_negative() {
        let cart = cart_of(&[300]);
        let take50 = DiscountDescriptor::fixed("TAKE50", Money::from_cents(5000));

        let quote = compute_settlement(
            &cart,
            Money::from_cents(100),
            Some(&take50),
            PaymentMode::Credits,
            Credits::new(1000),
        )
        .unwrap();

        assert_eq!(quote.discount_amount, Money::from_cents(300));
        // shipping $1.00 minus 5% of $3.00
        assert_eq!(quote.payable_dollars.amount(), dec!(0.85));
        assert_eq!(quote.payable_credits, Credits::new(85));
    }

    #[test]
    fn test_payable_floor_at_zero() {
        let cart = cart_of(&[1000]);
        let all = DiscountDescriptor::percent("ALL", dec!(100));

        let quote = compute_settlement(
            &cart,
            Money::zero(),
            Some(&all),
            PaymentMode::Credits,
            Credits::zero(),
        )
        .unwrap();

        assert_eq!(quote.payable_dollars, Money::zero());
        assert_eq!(quote.payable_credits, Credits::zero());
        assert!(quote.is_payable());
    }

    #[test]
    fn test_sub_cent_payable_rounds_credits_up() {
        // 5% of $0.99 = $0.0495
        let cart = cart_of(&[99]);
        let quote = compute_settlement(
            &cart,
            Money::zero(),
            None,
            PaymentMode::Credits,
            Credits::new(1000),
        )
        .unwrap();

        assert_eq!(quote.payable_dollars.amount(), dec!(0.9405));
        assert_eq!(quote.payable_credits, Credits::new(95));
        assert_eq!(quote.order_total(), Money::from_cents(94));
    }

    #[test]
    fn test_is_pure() {
        let cart = three_hundred();
        let save10 = DiscountDescriptor::percent("SAVE10", dec!(10));
        let compute = || {
            compute_settlement(
                &cart,
                Money::from_cents(799),
                Some(&save10),
                PaymentMode::Credits,
                Credits::new(12345),
            )
        };

        assert_eq!(compute(), compute());
    }

    #[test]
    fn test_empty_cart_quotes_shipping_only() {
        let quote = compute_settlement(
            &Cart::new(),
            Money::from_cents(500),
            None,
            PaymentMode::Dollars,
            Credits::zero(),
        )
        .unwrap();

        assert_eq!(quote.payable_dollars, Money::from_cents(500));
        assert_eq!(quote.credits_to_earn, Credits::zero());
    }

    #[test]
    fn test_rejects_negative_inputs() {
        let err = compute_settlement(
            &cart_of(&[100]),
            Money::from_cents(-1),
            None,
            PaymentMode::Dollars,
            Credits::zero(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBeNonNegative { .. })
        ));

        let err = compute_settlement(
            &cart_of(&[-100]),
            Money::zero(),
            None,
            PaymentMode::Dollars,
            Credits::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
