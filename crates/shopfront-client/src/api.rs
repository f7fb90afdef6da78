//! # Storefront API Port
//!
//! The remote services checkout depends on, as a trait. The HTTP
//! implementation lives in [`crate::http`]; tests substitute an in-memory
//! one.

use async_trait::async_trait;

use shopfront_core::{Cart, Credits, DiscountDescriptor, Money};

use crate::error::CheckoutResult;
use crate::protocol::{
    CreditLedgerResponse, CreditRewardRequest, CreditSpendRequest, OrderRecord, OrderSubmission,
    ShippingFeeRequest,
};

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Looks up a discount code. Unknown or expired codes are an error.
    async fn validate_discount(&self, code: &str) -> CheckoutResult<DiscountDescriptor>;

    async fn shipping_fee(&self, request: &ShippingFeeRequest) -> CheckoutResult<Money>;

    /// Authoritative credit balance for `email`.
    async fn credit_balance(&self, email: &str) -> CheckoutResult<Credits>;

    /// Deducts credits. Never retried automatically.
    async fn spend_credits(&self, request: &CreditSpendRequest)
        -> CheckoutResult<CreditLedgerResponse>;

    /// Adds loyalty credits. Never retried automatically.
    async fn reward_credits(
        &self,
        request: &CreditRewardRequest,
    ) -> CheckoutResult<CreditLedgerResponse>;

    /// Creates the order under `submission.idempotency_key`.
    ///
    /// Implementations may resend on transient failures; each send must
    /// carry the same key.
    async fn create_order(&self, submission: &OrderSubmission) -> CheckoutResult<OrderRecord>;

    /// The server-side cart for `email`.
    async fn fetch_cart(&self, email: &str) -> CheckoutResult<Cart>;
}
