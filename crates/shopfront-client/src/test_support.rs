//! In-memory storefront used by the checkout tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use shopfront_core::{Cart, Credits, DiscountDescriptor, Money};

use crate::api::StorefrontApi;
use crate::error::{CheckoutError, CheckoutResult};
use crate::protocol::{
    CreditLedgerResponse, CreditRewardRequest, CreditSpendRequest, OrderRecord, OrderSubmission,
    ShippingFeeRequest,
};

#[derive(Debug, Default)]
pub struct FakeState {
    pub balance: Credits,
    pub shipping_fee: Money,
    pub discounts: HashMap<String, DiscountDescriptor>,
    pub server_cart: Cart,
    pub orders: HashMap<Uuid, OrderRecord>,
    pub order_sends: Vec<Uuid>,
    pub spends: Vec<Credits>,
    pub rewards: Vec<Credits>,
    pub shipping_requests: Vec<ShippingFeeRequest>,
    pub fail_spend: bool,
    pub fail_reward: bool,
    pub fail_balance: bool,
    pub fail_orders: u32,
}

#[derive(Debug, Default)]
pub struct FakeStorefront {
    pub state: Mutex<FakeState>,
}

impl FakeStorefront {
    pub fn new(balance: Credits, shipping_fee: Money) -> Self {
        FakeStorefront {
            state: Mutex::new(FakeState {
                balance,
                shipping_fee,
                ..Default::default()
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

fn unavailable(what: &str) -> CheckoutError {
    CheckoutError::Api {
        status: 503,
        message: format!("{} unavailable", what),
    }
}

#[async_trait]
impl StorefrontApi for FakeStorefront {
    async fn validate_discount(&self, code: &str) -> CheckoutResult<DiscountDescriptor> {
        self.with(|s| {
            s.discounts
                .get(code)
                .cloned()
                .ok_or_else(|| CheckoutError::InvalidDiscount {
                    code: code.to_string(),
                    reason: "Invalid or expired discount code".to_string(),
                })
        })
    }

    async fn shipping_fee(&self, request: &ShippingFeeRequest) -> CheckoutResult<Money> {
        self.with(|s| {
            s.shipping_requests.push(request.clone());
            Ok(s.shipping_fee)
        })
    }

    async fn credit_balance(&self, _email: &str) -> CheckoutResult<Credits> {
        self.with(|s| {
            if s.fail_balance {
                return Err(unavailable("balance"));
            }
            Ok(s.balance)
        })
    }

    async fn spend_credits(
        &self,
        request: &CreditSpendRequest,
    ) -> CheckoutResult<CreditLedgerResponse> {
        self.with(|s| {
            if s.fail_spend {
                return Err(CheckoutError::Api {
                    status: 400,
                    message: "Insufficient credits".to_string(),
                });
            }
            s.spends.push(request.amount);
            s.balance = s.balance - request.amount;
            Ok(CreditLedgerResponse {
                balance: s.balance,
                transaction: None,
            })
        })
    }

    async fn reward_credits(
        &self,
        request: &CreditRewardRequest,
    ) -> CheckoutResult<CreditLedgerResponse> {
        self.with(|s| {
            if s.fail_reward {
                return Err(unavailable("rewards"));
            }
            s.rewards.push(request.amount);
            s.balance = s.balance + request.amount;
            Ok(CreditLedgerResponse {
                balance: s.balance,
                transaction: None,
            })
        })
    }

    async fn create_order(&self, submission: &OrderSubmission) -> CheckoutResult<OrderRecord> {
        self.with(|s| {
            s.order_sends.push(submission.idempotency_key);
            if let Some(existing) = s.orders.get(&submission.idempotency_key) {
                return Ok(existing.clone());
            }
            if s.fail_orders > 0 {
                s.fail_orders -= 1;
                return Err(unavailable("orders"));
            }
            let order = OrderRecord {
                id: format!("ord-{}", s.orders.len() + 1),
                email: Some(submission.email.clone()),
                total: Some(submission.total.amount()),
                status: Some("pending".to_string()),
                payment_method: Some(submission.payment_method.clone()),
                created_at: None,
            };
            s.orders.insert(submission.idempotency_key, order.clone());
            s.server_cart.clear();
            Ok(order)
        })
    }

    async fn fetch_cart(&self, _email: &str) -> CheckoutResult<Cart> {
        self.with(|s| Ok(s.server_cart.clone()))
    }
}
