//! # Wire Protocol
//!
//! Request and response bodies for the storefront REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/discounts/validate    {code}                → {data}        │
//! │  POST /api/user/getshippingfee   {originState, ...}    → {data}        │
//! │  GET  /api/credits/:email                              → {balance}     │
//! │  POST /api/credits/spend         {email, amount, ...}  → {balance, tx} │
//! │  POST /api/credits/reward        {email, amount, ...}  → {balance, tx} │
//! │  POST /api/orders                X-Idempotency-Key     → order         │
//! │  GET  /api/user/cart/:email                            → {data}        │
//! │                                                                         │
//! │  Errors (non-2xx): {message} or {error}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The API speaks camelCase JSON with plain numbers for amounts. Amounts are
//! kept as `Decimal` on our side and written with
//! `rust_decimal::serde::float`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfront_core::{
    Cart, CartLine, Credits, DiscountDescriptor, DiscountKind, Money, SettlementQuote,
    ShippingAddress,
};

/// Header carrying the per-attempt order key.
pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

// =============================================================================
// Envelopes
// =============================================================================

/// A response that may or may not be wrapped in `{data: ...}`.
///
/// Most endpoints wrap their payload; order creation returns the record bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Enveloped<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Enveloped<T> {
    pub fn into_inner(self) -> T {
        match self {
            Enveloped::Wrapped { data } => data,
            Enveloped::Bare(inner) => inner,
        }
    }
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// The first non-empty of `message` and `error`.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
    }
}

// =============================================================================
// Discounts
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DiscountValidationRequest<'a> {
    pub code: &'a str,
}

// =============================================================================
// Shipping
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeRequest {
    pub origin_state: String,
    pub destination_state: String,
    pub items_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeData {
    pub shipping_fee: Decimal,
}

// =============================================================================
// Credits
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreditBalanceResponse {
    pub balance: Credits,
}

/// Body of `POST /api/credits/spend`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSpendRequest {
    pub email: String,
    pub amount: Credits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub description: String,
}

/// Body of `POST /api/credits/reward`.
#[derive(Debug, Clone, Serialize)]
pub struct CreditRewardRequest {
    pub email: String,
    pub amount: Credits,
    pub description: String,
}

/// One entry in the shopper's credit ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub amount: i64,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of both credit mutations: the new authoritative balance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditLedgerResponse {
    pub balance: Credits,
    #[serde(default)]
    pub transaction: Option<CreditTransaction>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order ready to be sent, built once per checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub email: String,
    pub items: Vec<CartLine>,
    /// Dollars, rounded to cents.
    pub total: Money,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub idempotency_key: Uuid,
}

impl OrderSubmission {
    pub fn new(
        email: impl Into<String>,
        cart: &Cart,
        quote: &SettlementQuote,
        shipping_address: ShippingAddress,
        payment_method: impl Into<String>,
        idempotency_key: Uuid,
    ) -> Self {
        OrderSubmission {
            email: email.into(),
            items: cart.lines().to_vec(),
            total: quote.order_total(),
            shipping_address,
            payment_method: payment_method.into(),
            idempotency_key,
        }
    }

    /// The JSON body. The idempotency key travels as a header, not here.
    pub fn body(&self) -> OrderBody<'_> {
        OrderBody {
            email: &self.email,
            items: self.items.iter().map(OrderItem::from).collect(),
            total: self.total.amount(),
            shipping_address: &self.shipping_address,
            payment_method: &self.payment_method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem<'a> {
    pub code: &'a str,
    pub name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<&'a str>,
}

impl<'a> From<&'a CartLine> for OrderItem<'a> {
    fn from(line: &'a CartLine) -> Self {
        OrderItem {
            code: &line.code,
            name: &line.name,
            unit_price: line.unit_price.amount(),
            image: line.image.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody<'a> {
    pub email: &'a str,
    pub items: Vec<OrderItem<'a>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub shipping_address: &'a ShippingAddress,
    pub payment_method: &'a str,
}

/// The order record returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Cart
// =============================================================================

/// A cart line as stored remotely, where prices are plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartLine {
    pub code: String,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<RemoteCartLine> for CartLine {
    fn from(line: RemoteCartLine) -> Self {
        CartLine {
            code: line.code,
            name: line.name,
            unit_price: Money::from_dollars(line.unit_price),
            image: line.image,
        }
    }
}

/// Discount payload of the validation endpoint. The API names the kind
/// `type` and spells percent as `percentage`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDiscount {
    pub code: String,
    #[serde(alias = "type")]
    pub kind: RemoteDiscountKind,
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteDiscountKind {
    #[serde(alias = "percentage")]
    Percent,
    Fixed,
}

impl From<RemoteDiscount> for DiscountDescriptor {
    fn from(discount: RemoteDiscount) -> Self {
        let kind = match discount.kind {
            RemoteDiscountKind::Percent => DiscountKind::Percent,
            RemoteDiscountKind::Fixed => DiscountKind::Fixed,
        };
        DiscountDescriptor {
            code: discount.code,
            kind,
            value: discount.value,
        }
    }
}

pub type DiscountValidationResponse = Enveloped<RemoteDiscount>;
