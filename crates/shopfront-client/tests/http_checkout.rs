//! End-to-end tests of `HttpStorefrontApi` against an in-process storefront
//! that dedupes orders by `X-Idempotency-Key`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use shopfront_client::{
    apply_discount_code, submit_order, CheckoutError, CheckoutSession, ClientConfig,
    HttpStorefrontApi, OrderSubmission, StorefrontApi, IDEMPOTENCY_HEADER,
};
use shopfront_core::{
    compute_settlement, Cart, CartLine, Credits, Money, PaymentMode, ShippingAddress,
};

// =============================================================================
// Test Storefront
// =============================================================================

#[derive(Default)]
struct Storefront {
    balance: i64,
    orders: HashMap<String, Value>,
    order_keys: Vec<String>,
    fail_next_orders: u32,
    spend_calls: u32,
    fail_spend: bool,
    rewards: Vec<i64>,
    cart: Vec<Value>,
}

type Shared = Arc<Mutex<Storefront>>;

async fn validate_discount(Json(body): Json<Value>) -> Response {
    match body["code"].as_str() {
        Some("SAVE10") => Json(json!({
            "data": { "code": "SAVE10", "type": "percentage", "value": 10 }
        }))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid or expired discount code" })),
        )
            .into_response(),
    }
}

async fn shipping_fee(Json(body): Json<Value>) -> Response {
    let items = body["itemsCount"].as_u64().unwrap_or(0);
    let fee = if body["destinationState"] == body["originState"] {
        5.0
    } else {
        10.0
    };
    if items == 0 {
        return Json(json!({ "data": { "shippingFee": 0 } })).into_response();
    }
    Json(json!({ "data": { "shippingFee": fee } })).into_response()
}

async fn credit_balance(State(state): State<Shared>, Path(email): Path<String>) -> Response {
    if email == "garbled@example.com" {
        return (StatusCode::OK, "balance: lots").into_response();
    }
    let balance = state.lock().unwrap().balance;
    Json(json!({ "balance": balance })).into_response()
}

async fn spend_credits(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.spend_calls += 1;
    if s.fail_spend {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Ledger unavailable" })),
        )
            .into_response();
    }
    let amount = body["amount"].as_i64().unwrap_or(0);
    if amount > s.balance {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Insufficient credits" })),
        )
            .into_response();
    }
    s.balance -= amount;
    Json(json!({
        "balance": s.balance,
        "transaction": { "_id": "tx-1", "amount": -amount, "type": "spend",
                         "description": body["description"] }
    }))
    .into_response()
}

async fn reward_credits(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    let amount = body["amount"].as_i64().unwrap_or(0);
    s.balance += amount;
    s.rewards.push(amount);
    Json(json!({ "balance": s.balance, "transaction": { "amount": amount, "type": "reward" } }))
        .into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(key) = headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Missing idempotency key" })),
        )
            .into_response();
    };

    let mut s = state.lock().unwrap();
    s.order_keys.push(key.clone());

    if s.fail_next_orders > 0 {
        s.fail_next_orders -= 1;
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Try again" })),
        )
            .into_response();
    }

    if let Some(existing) = s.orders.get(&key) {
        return (StatusCode::OK, Json(existing.clone())).into_response();
    }

    let order = json!({
        "_id": format!("ord-{}", s.orders.len() + 1),
        "email": body["email"],
        "total": body["total"],
        "status": "pending",
        "paymentMethod": body["paymentMethod"],
        "createdAt": "2026-10-18T12:00:00Z"
    });
    s.orders.insert(key, order.clone());
    s.cart.clear();
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn fetch_cart(State(state): State<Shared>, Path(_email): Path<String>) -> Response {
    let cart = state.lock().unwrap().cart.clone();
    Json(json!({ "data": cart })).into_response()
}

async fn start_storefront(storefront: Storefront) -> (Shared, SocketAddr) {
    let state: Shared = Arc::new(Mutex::new(storefront));

    let app = Router::new()
        .route("/api/discounts/validate", post(validate_discount))
        .route("/api/user/getshippingfee", post(shipping_fee))
        .route("/api/credits/spend", post(spend_credits))
        .route("/api/credits/reward", post(reward_credits))
        .route("/api/credits/{email}", get(credit_balance))
        .route("/api/orders", post(create_order))
        .route("/api/user/cart/{email}", get(fetch_cart))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (state, addr)
}

fn client(addr: SocketAddr, max_retries: u32) -> HttpStorefrontApi {
    let mut config = ClientConfig::default();
    config.api.base_url = format!("http://{}", addr);
    config.retry.max_retries = max_retries;
    config.retry.initial_backoff_ms = 5;
    config.retry.max_backoff_secs = 1;
    HttpStorefrontApi::new(&config).unwrap()
}

fn address() -> ShippingAddress {
    ShippingAddress {
        name: "Ada Lovelace".into(),
        street: "1 Analytical Way".into(),
        city: "Albany".into(),
        state: "NY".into(),
        postal_code: "12207".into(),
        country: "US".into(),
    }
}

fn three_hundred_dollar_cart() -> Vec<CartLine> {
    vec![
        CartLine::new("LAMP", "Lamp", Money::from_cents(10000)),
        CartLine::new("DESK", "Desk", Money::from_cents(15000)),
        CartLine::new("MAT", "Mat", Money::from_cents(5000)),
    ]
}

fn submission(key: Uuid) -> OrderSubmission {
    let cart = Cart::from_lines(three_hundred_dollar_cart());
    let quote = compute_settlement(
        &cart,
        Money::from_cents(1000),
        None,
        PaymentMode::Dollars,
        Credits::zero(),
    )
    .unwrap();
    OrderSubmission::new("ada@example.com", &cart, &quote, address(), "card", key)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_double_submit_creates_one_order() {
    let (state, addr) = start_storefront(Storefront::default()).await;
    let api = client(addr, 3);
    let order = submission(Uuid::new_v4());

    let first = api.create_order(&order).await.unwrap();
    let second = api.create_order(&order).await.unwrap();

    assert_eq!(first.id, second.id);
    let s = state.lock().unwrap();
    assert_eq!(s.orders.len(), 1);
    assert_eq!(s.order_keys.len(), 2);
}

#[tokio::test]
async fn test_transient_failures_retry_with_same_key() {
    let (state, addr) = start_storefront(Storefront {
        fail_next_orders: 2,
        ..Default::default()
    })
    .await;
    let api = client(addr, 3);
    let key = Uuid::new_v4();

    let order = api.create_order(&submission(key)).await.unwrap();

    assert_eq!(order.id, "ord-1");
    assert_eq!(order.status.as_deref(), Some("pending"));
    assert!(order.created_at.is_some());
    let s = state.lock().unwrap();
    assert_eq!(s.order_keys, vec![key.to_string(); 3]);
    assert_eq!(s.orders.len(), 1);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let (state, addr) = start_storefront(Storefront {
        fail_next_orders: 10,
        ..Default::default()
    })
    .await;
    let api = client(addr, 2);

    let err = api.create_order(&submission(Uuid::new_v4())).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Api { status: 503, .. }));
    assert_eq!(state.lock().unwrap().order_keys.len(), 3);
}

#[tokio::test]
async fn test_credit_spend_is_never_resent() {
    let (state, addr) = start_storefront(Storefront {
        balance: 50000,
        fail_spend: true,
        ..Default::default()
    })
    .await;
    let api = client(addr, 3);
    let mut session = CheckoutSession::new("ada@example.com", "CA").unwrap();
    for line in three_hundred_dollar_cart() {
        session.add_line(line).unwrap();
    }
    session.set_payment_mode(PaymentMode::Credits);
    session.set_credit_balance(Credits::new(50000));

    let err = submit_order(&api, &mut session, &address(), "credits")
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::PaymentFailure(ref m) if m.contains("Ledger unavailable")));
    let s = state.lock().unwrap();
    assert_eq!(s.spend_calls, 1);
    assert!(s.orders.is_empty());
}

#[tokio::test]
async fn test_credit_checkout_end_to_end() {
    let (state, addr) = start_storefront(Storefront {
        balance: 30000,
        ..Default::default()
    })
    .await;
    let api = client(addr, 3);
    let mut session = CheckoutSession::new("ada@example.com", "CA").unwrap();
    for line in three_hundred_dollar_cart() {
        session.add_line(line).unwrap();
    }
    session.set_payment_mode(PaymentMode::Credits);
    session.set_credit_balance(api.credit_balance("ada@example.com").await.unwrap());

    let result = submit_order(&api, &mut session, &address(), "credits")
        .await
        .unwrap();

    assert_eq!(result.quote.shipping_cost, Money::from_cents(1000));
    assert_eq!(result.credits_spent, Some(Credits::new(29500)));
    assert_eq!(result.balance, Credits::new(500));
    assert!(session.cart().is_empty());
    let s = state.lock().unwrap();
    assert_eq!(s.orders.len(), 1);
    assert!(s.rewards.is_empty());
}

#[tokio::test]
async fn test_dollar_checkout_rewards_credits() {
    let (state, addr) = start_storefront(Storefront::default()).await;
    let api = client(addr, 3);
    let mut session = CheckoutSession::new("ada@example.com", "CA").unwrap();
    for line in three_hundred_dollar_cart() {
        session.add_line(line).unwrap();
    }

    let result = submit_order(&api, &mut session, &address(), "card")
        .await
        .unwrap();

    assert_eq!(result.credits_earned, Some(Credits::new(1500)));
    assert_eq!(result.balance, Credits::new(1500));
    assert_eq!(state.lock().unwrap().rewards, vec![1500]);
}

#[tokio::test]
async fn test_discount_rejection_carries_server_message() {
    let (_state, addr) = start_storefront(Storefront::default()).await;
    let api = client(addr, 3);
    let mut session = CheckoutSession::new("ada@example.com", "CA").unwrap();

    let err = apply_discount_code(&api, &mut session, "OLDCODE")
        .await
        .unwrap_err();
    match err {
        CheckoutError::InvalidDiscount { code, reason } => {
            assert_eq!(code, "OLDCODE");
            assert_eq!(reason, "Invalid or expired discount code");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let descriptor = apply_discount_code(&api, &mut session, "SAVE10")
        .await
        .unwrap();
    assert_eq!(descriptor.code, "SAVE10");
    assert!(session.discount().is_some());
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (_state, addr) = start_storefront(Storefront::default()).await;
    let api = client(addr, 3);

    let err = api.credit_balance("garbled@example.com").await.unwrap_err();

    assert!(matches!(err, CheckoutError::Deserialization(_)));
    assert!(!err.is_retryable());
}
