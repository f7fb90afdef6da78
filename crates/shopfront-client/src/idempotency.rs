//! # Checkout Attempts
//!
//! One logical checkout attempt owns one idempotency key. Every send of the
//! order for that attempt, automatic retry or a second click on "Place
//! order", carries the same key, so the server creates the order at most
//! once.
//!
//! ```text
//!   new() ──► key A ──► submit ──► timeout ──► retry (key A) ──► 201
//!                                                                  │
//!   finish() ◄─────────────────────────────────────────────────────┘
//!      │
//!      ▼
//!   key B (next checkout)
//! ```
//!
//! The attempt also remembers a credit spend already made for it, so a
//! resubmit after a failed order creation does not charge the shopper twice.
//! That spend stays with the checkout until an order consumes it: an explicit
//! [`CheckoutAttempt::restart`] carries it into the new attempt, only
//! [`CheckoutAttempt::complete`] drops it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use shopfront_core::Credits;

#[derive(Debug, Clone)]
pub struct CheckoutAttempt {
    key: Uuid,
    started_at: DateTime<Utc>,
    credits_spent: Option<Credits>,
    submissions: u32,
}

impl CheckoutAttempt {
    pub fn new() -> Self {
        CheckoutAttempt {
            key: Uuid::new_v4(),
            started_at: Utc::now(),
            credits_spent: None,
            submissions: 0,
        }
    }

    /// The idempotency key sent with every order request of this attempt.
    pub fn key(&self) -> Uuid {
        self.key
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Counts a send of the order and returns the running count.
    pub fn record_submission(&mut self) -> u32 {
        self.submissions += 1;
        self.submissions
    }

    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    /// Remembers that `amount` credits were spent for this attempt.
    pub fn record_spend(&mut self, amount: Credits) {
        self.credits_spent = Some(amount);
    }

    pub fn credits_spent(&self) -> Option<Credits> {
        self.credits_spent
    }

    /// Starts a new logical attempt with a fresh key, keeping any credits
    /// already charged that no order has consumed yet. Returns the new key.
    pub fn restart(&mut self) -> Uuid {
        let carried = self.credits_spent;
        *self = CheckoutAttempt::new();
        self.credits_spent = carried;
        self.key
    }

    /// Starts the next checkout after an order was created. The spend, if
    /// any, was consumed by that order. Returns the new key.
    pub fn complete(&mut self) -> Uuid {
        *self = CheckoutAttempt::new();
        self.key
    }
}

impl Default for CheckoutAttempt {
    fn default() -> Self {
        Self::new()
    }
}
