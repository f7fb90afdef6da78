//! # shopfront-client: Checkout Against the Storefront API
//!
//! Everything in checkout that talks to the network: discount validation,
//! shipping quotes, the credit ledger and order creation, plus the session
//! state the checkout screen renders from.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Client Architecture                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  checkout (flow functions)                       │  │
//! │  │  apply_discount_code · refresh_shipping_quote · submit_order     │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ CheckoutSession│  │ StorefrontApi  │  │  CheckoutAttempt       │    │
//! │  │                │  │ (trait)        │  │                        │    │
//! │  │ cart, balance, │  │                │  │ one idempotency key    │    │
//! │  │ discount, mode │  │ HttpStorefront │  │ per logical checkout   │    │
//! │  │ shipping quote │  │ Api: reqwest + │  │                        │    │
//! │  │                │  │ backoff        │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  Pricing itself is shopfront-core::compute_settlement.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`api`] - The `StorefrontApi` port
//! - [`checkout`] - Discount, shipping, balance and order flows
//! - [`config`] - Client configuration (TOML + environment)
//! - [`error`] - Checkout error types
//! - [`http`] - reqwest implementation of the port
//! - [`idempotency`] - Checkout attempts and their keys
//! - [`protocol`] - Request and response bodies
//! - [`session`] - Checkout session state
//! - [`shipping`] - Shipping quote tracking
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfront_client::{submit_order, CheckoutSession, ClientConfig, HttpStorefrontApi};
//!
//! let config = ClientConfig::load(None)?;
//! let api = HttpStorefrontApi::new(&config)?;
//!
//! let mut session = CheckoutSession::new("ada@example.com", config.origin_state())?;
//! session.add_line(line)?;
//!
//! let result = submit_order(&api, &mut session, &address, "card").await?;
//! println!("Order {} placed", result.order.id);
//! ```

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod idempotency;
pub mod protocol;
pub mod session;
pub mod shipping;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::StorefrontApi;
pub use checkout::{
    apply_discount_code, refresh_balance, refresh_cart, refresh_shipping_quote, submit_order,
    OrderReceipt, OrderResult,
};
pub use config::{ApiSettings, ClientConfig, RetrySettings, StoreSettings};
pub use error::{CheckoutError, CheckoutResult};
pub use http::HttpStorefrontApi;
pub use idempotency::CheckoutAttempt;
pub use protocol::{OrderRecord, OrderSubmission, IDEMPOTENCY_HEADER};
pub use session::CheckoutSession;
pub use shipping::{ShippingQuoteKey, ShippingQuoteTracker, ShippingTicket};
