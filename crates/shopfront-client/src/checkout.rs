//! # Checkout Flow
//!
//! The remote half of checkout: discount lookup, shipping quotes, balance
//! refresh and order submission.
//!
//! ## Order Submission
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        submit_order                                     │
//! │                                                                         │
//! │  1. validate address, payment method, cart not empty                    │
//! │  2. shipping quote current? else fetch it                               │
//! │  3. quote = session.quote(); ensure_payable()  ──► InsufficientCredits  │
//! │  4. paying credits: spend payable_credits      ──► PaymentFailure       │
//! │     (skipped if this attempt already spent them)                        │
//! │  5. create order, X-Idempotency-Key = attempt key                       │
//! │  6. session.finish_checkout()  (cart cleared, new key for next time)    │
//! │  7. paying dollars: reward credits_to_earn     ──► warn only            │
//! │  8. re-fetch balance and cart                  ──► warn only            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure before step 5 leaves the cart untouched. A failure at step 5
//! keeps the attempt, so submitting again reuses both the idempotency key
//! and the credits already spent.

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shopfront_core::validation::{validate_address, validate_code};
use shopfront_core::{Credits, DiscountDescriptor, Money, SettlementQuote, ShippingAddress, ValidationError};

use crate::api::StorefrontApi;
use crate::error::{CheckoutError, CheckoutResult};
use crate::protocol::{CreditRewardRequest, CreditSpendRequest, OrderRecord, OrderSubmission};
use crate::session::CheckoutSession;

/// Outcome of a successful [`submit_order`].
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order: OrderRecord,
    /// The quote the order was placed with.
    pub quote: SettlementQuote,
    pub idempotency_key: Uuid,
    pub credits_spent: Option<Credits>,
    pub credits_earned: Option<Credits>,
    /// Set when the order went through but loyalty credits were not added.
    pub reward_error: Option<String>,
    /// Balance after the order, as last reported by the server.
    pub balance: Credits,
}

/// Summary printed to the shopper once the order exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub total: Money,
    pub credits_spent: Option<Credits>,
    pub credits_earned: Option<Credits>,
    pub balance: Credits,
}

impl From<&OrderResult> for OrderReceipt {
    fn from(result: &OrderResult) -> Self {
        OrderReceipt {
            order_id: result.order.id.clone(),
            total: result.quote.order_total(),
            credits_spent: result.credits_spent,
            credits_earned: result.credits_earned,
            balance: result.balance,
        }
    }
}

// =============================================================================
// Discounts, Shipping, Balance
// =============================================================================

/// Validates `code` remotely and applies it to the session.
///
/// A rejected code leaves the session without any discount.
pub async fn apply_discount_code<A>(
    api: &A,
    session: &mut CheckoutSession,
    code: &str,
) -> CheckoutResult<DiscountDescriptor>
where
    A: StorefrontApi + ?Sized,
{
    let code = code.trim();
    if let Err(e) = validate_code("discount code", code) {
        session.clear_discount();
        return Err(e.into());
    }

    match api.validate_discount(code).await {
        Ok(descriptor) => {
            descriptor.validate()?;
            info!(code = %descriptor.code, kind = ?descriptor.kind, value = %descriptor.value, "Discount applied");
            session.set_discount(descriptor.clone());
            Ok(descriptor)
        }
        Err(e) => {
            session.clear_discount();
            debug!(code, error = %e, "Discount code rejected");
            Err(e)
        }
    }
}

/// Fetches the shipping fee for the session's current cart and destination.
///
/// Returns [`CheckoutError::StaleResponse`] if a newer quote was requested
/// while this one was in flight.
pub async fn refresh_shipping_quote<A>(
    api: &A,
    session: &mut CheckoutSession,
) -> CheckoutResult<Money>
where
    A: StorefrontApi + ?Sized,
{
    let ticket = session.begin_shipping_quote()?;
    let request = ticket.key().to_request();

    match api.shipping_fee(&request).await {
        Ok(fee) => {
            debug!(
                origin = %request.origin_state,
                destination = %request.destination_state,
                items = request.items_count,
                fee = %fee,
                "Shipping quoted"
            );
            session.complete_shipping_quote(ticket, fee)
        }
        Err(e) => {
            warn!(error = %e, "Shipping quote failed");
            Err(e)
        }
    }
}

/// Replaces the cached balance with the server's.
pub async fn refresh_balance<A>(api: &A, session: &mut CheckoutSession) -> CheckoutResult<Credits>
where
    A: StorefrontApi + ?Sized,
{
    let balance = api.credit_balance(session.email()).await?;
    session.set_credit_balance(balance);
    Ok(balance)
}

/// Replaces the local cart with the server's.
pub async fn refresh_cart<A>(api: &A, session: &mut CheckoutSession) -> CheckoutResult<()>
where
    A: StorefrontApi + ?Sized,
{
    let cart = api.fetch_cart(session.email()).await?;
    session.replace_cart(cart);
    Ok(())
}

// =============================================================================
// Order Submission
// =============================================================================

/// Places the order for everything in the session.
pub async fn submit_order<A>(
    api: &A,
    session: &mut CheckoutSession,
    address: &ShippingAddress,
    payment_method: &str,
) -> CheckoutResult<OrderResult>
where
    A: StorefrontApi + ?Sized,
{
    validate_address(address)?;
    let payment_method = payment_method.trim();
    if payment_method.is_empty() {
        return Err(ValidationError::Required {
            field: "payment method".to_string(),
        }
        .into());
    }
    if session.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    session.set_destination_state(address.state.clone())?;
    if !session.has_current_shipping_quote() {
        refresh_shipping_quote(api, session).await?;
    }

    let quote = session.quote()?;
    quote.ensure_payable()?;

    let key = session.attempt().key();
    let send = session.attempt_mut().record_submission();
    info!(
        email = %session.email(),
        idempotency_key = %key,
        attempt = send,
        total = %quote.order_total(),
        mode = ?quote.payment_mode,
        "Submitting order"
    );

    let credits_spent = if quote.payment_mode.is_credits() {
        spend_for_attempt(api, session, &quote, key).await?
    } else {
        None
    };

    let submission = OrderSubmission::new(
        session.email(),
        session.cart(),
        &quote,
        address.clone(),
        payment_method,
        key,
    );

    let order = match api.create_order(&submission).await {
        Ok(order) => order,
        Err(e) => {
            if let Some(spent) = credits_spent {
                error!(
                    idempotency_key = %key,
                    credits = spent.value(),
                    error = %e,
                    "Order creation failed after credits were spent; resubmit to complete"
                );
            } else {
                warn!(idempotency_key = %key, error = %e, "Order creation failed");
            }
            return Err(e);
        }
    };

    info!(order_id = %order.id, idempotency_key = %key, "Order created");
    session.finish_checkout();

    let mut credits_earned = None;
    let mut reward_error = None;
    if !quote.payment_mode.is_credits() && !quote.credits_to_earn.is_zero() {
        let request = CreditRewardRequest {
            email: session.email().to_string(),
            amount: quote.credits_to_earn,
            description: format!("Reward for order {}", order.id),
        };
        match api.reward_credits(&request).await {
            Ok(response) => {
                session.set_credit_balance(response.balance);
                credits_earned = Some(quote.credits_to_earn);
            }
            Err(e) => {
                let err = CheckoutError::RewardAccrualFailure(e.to_string());
                warn!(order_id = %order.id, credits = quote.credits_to_earn.value(), error = %err, "Reward not credited");
                reward_error = Some(err.to_string());
            }
        }
    }

    if let Err(e) = refresh_balance(api, session).await {
        warn!(error = %e, "Balance refresh after order failed");
    }
    if let Err(e) = refresh_cart(api, session).await {
        warn!(error = %e, "Cart refresh after order failed");
    }

    Ok(OrderResult {
        order,
        quote,
        idempotency_key: key,
        credits_spent,
        credits_earned,
        reward_error,
        balance: session.credit_balance(),
    })
}

/// Spends the credits for the current attempt, at most once per attempt.
async fn spend_for_attempt<A>(
    api: &A,
    session: &mut CheckoutSession,
    quote: &SettlementQuote,
    key: Uuid,
) -> CheckoutResult<Option<Credits>>
where
    A: StorefrontApi + ?Sized,
{
    match session.attempt().credits_spent() {
        Some(spent) if spent == quote.payable_credits => {
            debug!(idempotency_key = %key, credits = spent.value(), "Credits already spent for this attempt");
            return Ok(Some(spent));
        }
        Some(spent) => {
            return Err(CheckoutError::PaymentFailure(format!(
                "{} were already charged for this checkout but the order now costs {}; restore the order to use them",
                spent, quote.payable_credits
            )));
        }
        None => {}
    }

    if quote.payable_credits.is_zero() {
        return Ok(None);
    }

    let request = CreditSpendRequest {
        email: session.email().to_string(),
        amount: quote.payable_credits,
        order_id: None,
        description: format!("Order payment (checkout {})", key),
    };

    let response = api.spend_credits(&request).await.map_err(|e| {
        warn!(idempotency_key = %key, error = %e, "Credit payment failed");
        CheckoutError::PaymentFailure(e.to_string())
    })?;

    session.attempt_mut().record_spend(quote.payable_credits);
    session.set_credit_balance(response.balance);
    info!(
        idempotency_key = %key,
        credits = quote.payable_credits.value(),
        balance = response.balance.value(),
        "Credits spent"
    );

    Ok(Some(quote.payable_credits))
}
