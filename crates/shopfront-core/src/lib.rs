//! # shopfront-core: Pure Pricing Logic for the Storefront Checkout
//!
//! This crate holds the checkout arithmetic as pure functions with zero I/O
//! dependencies: dollar/credit conversion, discount codes, and the settlement
//! quote shown on the checkout screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Checkout Architecture                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (out of scope)                 │   │
//! │  │      Cart View ──► Checkout View ──► Credit Store ──► Receipt   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ compute_settlement / submit_order      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shopfront-client                             │   │
//! │  │       REST calls, session cache, idempotent order submit        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopfront-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  credits  │  │ discount  │  │settlement │  │ validation│  │   │
//! │  │   │ $ ↔ cr    │  │ percent   │  │  quote    │  │   rules   │  │   │
//! │  │   │ earn rate │  │ fixed     │  │ shortfall │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCKS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` (exact decimal dollars) and `Credits` (integer credits)
//! - [`credits`] - Conversion primitives and the loyalty earn rate
//! - [`discount`] - Discount descriptors and their applied amounts
//! - [`settlement`] - The settlement quote computed at checkout
//! - [`types`] - Cart lines, carts, payment mode, shipping address
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use shopfront_core::{compute_settlement, Cart, CartLine, Credits, Money, PaymentMode};
//!
//! let mut cart = Cart::new();
//! cart.push(CartLine::new("MUG-01", "Mug", Money::from_cents(30000)));
//!
//! let quote = compute_settlement(
//!     &cart,
//!     Money::from_cents(1000),
//!     None,
//!     PaymentMode::Dollars,
//!     Credits::zero(),
//! )
//! .unwrap();
//!
//! assert_eq!(quote.payable_dollars.amount(), Decimal::from(310));
//! assert_eq!(quote.credits_to_earn, Credits::new(1500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credits;
pub mod discount;
pub mod error;
pub mod money;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use credits::{
    calculate_credit_discount, calculate_earned_credits, credits_to_dollars, dollars_to_credits,
};
pub use discount::{DiscountDescriptor, DiscountKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Credits, Money};
pub use settlement::{compute_settlement, SettlementQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Credits that make up one dollar when spending credits.
pub const CREDITS_PER_DOLLAR: i64 = 100;

/// Credits earned per whole dollar of a dollar-paid purchase.
///
/// ## Business Reason
/// 5% loyalty-back expressed in credits. The earn scale (5 per $1) and the
/// spend scale (100 per $1) are intentionally different.
pub const EARNED_CREDITS_PER_DOLLAR: i64 = 5;

/// Incentive for paying with credits, in basis points of the subtotal (5%).
pub const CREDIT_PAYMENT_DISCOUNT_BPS: u32 = 500;

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 200;
