//! # Checkout Session
//!
//! Everything the checkout screen reads, owned in one place.
//!
//! ## Session Contents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CheckoutSession                                  │
//! │                                                                         │
//! │  email ─────────── keys credits, cart and orders remotely               │
//! │  cart ──────────── local copy; re-fetched after every order             │
//! │  credit_balance ── cache of the server balance                          │
//! │  discount ──────── validated descriptor, this session only              │
//! │  payment_mode ──── dollars | credits                                    │
//! │  shipping ──────── quote tracker keyed by (origin, destination, items)  │
//! │  attempt ───────── idempotency key of the current checkout              │
//! │                                                                         │
//! │  quote() ───────── compute_settlement(...) from the fields above,       │
//! │                    recomputed from scratch on every call                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session holds no locks. A UI that shares it across tasks wraps it the
//! way it wraps any other state.

use tracing::debug;

use shopfront_core::validation::{validate_email, validate_state_code};
use shopfront_core::{
    compute_settlement, Cart, CartLine, CoreResult, Credits, DiscountDescriptor, Money,
    PaymentMode, SettlementQuote, ValidationError, MAX_CART_LINES,
};

use crate::error::CheckoutResult;
use crate::idempotency::CheckoutAttempt;
use crate::shipping::{ShippingQuoteKey, ShippingQuoteTracker, ShippingTicket};

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    email: String,
    origin_state: String,
    destination_state: Option<String>,
    cart: Cart,
    credit_balance: Credits,
    discount: Option<DiscountDescriptor>,
    payment_mode: PaymentMode,
    shipping: ShippingQuoteTracker,
    attempt: CheckoutAttempt,
}

impl CheckoutSession {
    /// Starts a session for a logged-in shopper.
    pub fn new(email: impl Into<String>, origin_state: impl Into<String>) -> CheckoutResult<Self> {
        let email = email.into().trim().to_string();
        let origin_state = origin_state.into();
        validate_email(&email)?;
        validate_state_code("origin state", &origin_state)?;

        Ok(CheckoutSession {
            email,
            origin_state,
            destination_state: None,
            cart: Cart::new(),
            credit_balance: Credits::zero(),
            discount: None,
            payment_mode: PaymentMode::default(),
            shipping: ShippingQuoteTracker::new(),
            attempt: CheckoutAttempt::new(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of a product.
    pub fn add_line(&mut self, line: CartLine) -> CheckoutResult<()> {
        if self.cart.item_count() >= MAX_CART_LINES {
            return Err(ValidationError::OutOfRange {
                field: "cart items".to_string(),
                min: 0,
                max: MAX_CART_LINES as i64,
            }
            .into());
        }
        debug!(code = %line.code, "Adding cart line");
        self.cart.push(line);
        Ok(())
    }

    /// Removes one unit of `code`; false if it was not in the cart.
    pub fn remove_one(&mut self, code: &str) -> bool {
        self.cart.remove_one(code)
    }

    /// Replaces the local cart with the server's copy.
    pub fn replace_cart(&mut self, cart: Cart) {
        self.cart = cart;
    }

    // =========================================================================
    // Balance, Discount, Payment Mode
    // =========================================================================

    pub fn credit_balance(&self) -> Credits {
        self.credit_balance
    }

    pub fn set_credit_balance(&mut self, balance: Credits) {
        self.credit_balance = balance;
    }

    pub fn discount(&self) -> Option<&DiscountDescriptor> {
        self.discount.as_ref()
    }

    pub fn set_discount(&mut self, discount: DiscountDescriptor) {
        self.discount = Some(discount);
    }

    pub fn clear_discount(&mut self) {
        self.discount = None;
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn set_payment_mode(&mut self, mode: PaymentMode) {
        self.payment_mode = mode;
    }

    // =========================================================================
    // Shipping
    // =========================================================================

    pub fn origin_state(&self) -> &str {
        &self.origin_state
    }

    pub fn destination_state(&self) -> Option<&str> {
        self.destination_state.as_deref()
    }

    pub fn set_destination_state(&mut self, state: impl Into<String>) -> CheckoutResult<()> {
        let state = state.into();
        validate_state_code("destination state", &state)?;
        self.destination_state = Some(state);
        Ok(())
    }

    /// What the shipping fee for the current cart depends on. `None` until a
    /// destination is known.
    pub fn shipping_key(&self) -> Option<ShippingQuoteKey> {
        self.destination_state.as_ref().map(|destination| {
            ShippingQuoteKey::new(&self.origin_state, destination, self.cart.item_count())
        })
    }

    /// Starts a shipping-fee request for the current cart and destination.
    pub fn begin_shipping_quote(&mut self) -> CheckoutResult<ShippingTicket> {
        let key = self.shipping_key().ok_or_else(|| ValidationError::Required {
            field: "destination state".to_string(),
        })?;
        Ok(self.shipping.begin(key))
    }

    /// Stores a fee unless a newer request has been started since.
    pub fn complete_shipping_quote(
        &mut self,
        ticket: ShippingTicket,
        fee: Money,
    ) -> CheckoutResult<Money> {
        if fee.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "shipping fee".to_string(),
            }
            .into());
        }
        self.shipping.complete(ticket, fee)
    }

    /// True when the stored fee was quoted for the current cart and
    /// destination.
    pub fn has_current_shipping_quote(&self) -> bool {
        self.shipping_key()
            .is_some_and(|key| self.shipping.fee_for(&key).is_some())
    }

    /// Fee for the current cart and destination, or zero when none has been
    /// quoted yet.
    pub fn shipping_cost(&self) -> Money {
        self.shipping_key()
            .and_then(|key| self.shipping.fee_for(&key))
            .unwrap_or_default()
    }

    // =========================================================================
    // Quote & Attempt
    // =========================================================================

    /// The settlement quote for the session as it stands.
    ///
    /// Credits already charged to the current attempt still count toward it.
    pub fn quote(&self) -> CoreResult<SettlementQuote> {
        let held = self.attempt.credits_spent().unwrap_or_default();
        let available = self.credit_balance.saturating_add(held);
        compute_settlement(
            &self.cart,
            self.shipping_cost(),
            self.discount.as_ref(),
            self.payment_mode,
            available,
        )
    }

    pub fn attempt(&self) -> &CheckoutAttempt {
        &self.attempt
    }

    pub fn attempt_mut(&mut self) -> &mut CheckoutAttempt {
        &mut self.attempt
    }

    /// Explicit restart by the shopper: a new idempotency key. Credits
    /// charged for the previous attempt without an order stay on the session.
    pub fn restart_checkout(&mut self) {
        let key = self.attempt.restart();
        debug!(
            idempotency_key = %key,
            credits_held = self.attempt.credits_spent().unwrap_or_default().value(),
            "Checkout restarted"
        );
    }

    /// Resets the session after an order was created.
    pub fn finish_checkout(&mut self) {
        self.cart.clear();
        self.discount = None;
        self.shipping.clear();
        self.attempt.complete();
    }
}
