//! # Shipping Quote Tracking
//!
//! The shipping fee is re-requested whenever the destination state or the
//! number of items changes. Responses can arrive out of order, so each
//! request gets a ticket and only the newest ticket may update the quote.
//!
//! ```text
//!   begin(CA→NY, 2) ─► ticket #1 ───────────────────┐
//!   begin(CA→NY, 3) ─► ticket #2 ──► $9.00 ──► kept │
//!                                                   ▼
//!                                  $7.50 (ticket #1) dropped as stale
//! ```

use tracing::debug;

use shopfront_core::Money;

use crate::error::{CheckoutError, CheckoutResult};
use crate::protocol::ShippingFeeRequest;

/// What a shipping fee depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShippingQuoteKey {
    pub origin_state: String,
    pub destination_state: String,
    pub items_count: usize,
}

impl ShippingQuoteKey {
    pub fn new(
        origin_state: impl Into<String>,
        destination_state: impl Into<String>,
        items_count: usize,
    ) -> Self {
        ShippingQuoteKey {
            origin_state: origin_state.into().trim().to_uppercase(),
            destination_state: destination_state.into().trim().to_uppercase(),
            items_count,
        }
    }

    pub fn to_request(&self) -> ShippingFeeRequest {
        ShippingFeeRequest {
            origin_state: self.origin_state.clone(),
            destination_state: self.destination_state.clone(),
            items_count: self.items_count,
        }
    }
}

/// Handle for one in-flight shipping-fee request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingTicket {
    generation: u64,
    key: ShippingQuoteKey,
}

impl ShippingTicket {
    pub fn key(&self) -> &ShippingQuoteKey {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShippingQuoteTracker {
    generation: u64,
    current: Option<(ShippingQuoteKey, Money)>,
}

impl ShippingQuoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request; any older ticket becomes stale.
    pub fn begin(&mut self, key: ShippingQuoteKey) -> ShippingTicket {
        self.generation += 1;
        ShippingTicket {
            generation: self.generation,
            key,
        }
    }

    /// Stores the fee for `ticket` unless a newer request was started.
    pub fn complete(&mut self, ticket: ShippingTicket, fee: Money) -> CheckoutResult<Money> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "Discarding stale shipping quote"
            );
            return Err(CheckoutError::StaleResponse("shipping fee"));
        }

        self.current = Some((ticket.key, fee));
        Ok(fee)
    }

    /// The fee quoted for exactly `key`, if the last stored quote matches.
    pub fn fee_for(&self, key: &ShippingQuoteKey) -> Option<Money> {
        match &self.current {
            Some((quoted, fee)) if quoted == key => Some(*fee),
            _ => None,
        }
    }

    /// The last stored quote regardless of key.
    pub fn last_quote(&self) -> Option<(&ShippingQuoteKey, Money)> {
        self.current.as_ref().map(|(key, fee)| (key, *fee))
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(items: usize) -> ShippingQuoteKey {
        ShippingQuoteKey::new("CA", "NY", items)
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = ShippingQuoteTracker::new();
        let first = tracker.begin(key(2));
        let second = tracker.begin(key(3));

        assert_eq!(
            tracker.complete(second, Money::from_cents(900)).unwrap(),
            Money::from_cents(900)
        );
        assert!(matches!(
            tracker.complete(first, Money::from_cents(750)),
            Err(CheckoutError::StaleResponse(_))
        ));

        assert_eq!(tracker.fee_for(&key(3)), Some(Money::from_cents(900)));
        assert_eq!(tracker.fee_for(&key(2)), None);
    }

    #[test]
    fn test_key_change_invalidates_quote() {
        let mut tracker = ShippingQuoteTracker::new();
        let ticket = tracker.begin(key(1));
        tracker.complete(ticket, Money::from_cents(500)).unwrap();

        assert_eq!(tracker.fee_for(&key(1)), Some(Money::from_cents(500)));
        assert_eq!(tracker.fee_for(&ShippingQuoteKey::new("CA", "TX", 1)), None);
    }

    #[test]
    fn test_state_codes_are_normalized() {
        assert_eq!(ShippingQuoteKey::new(" ca", "ny ", 1), key(1));
    }

    #[test]
    fn test_clear_drops_quote_and_in_flight() {
        let mut tracker = ShippingQuoteTracker::new();
        let ticket = tracker.begin(key(1));
        tracker.clear();

        assert!(tracker.complete(ticket, Money::from_cents(500)).is_err());
        assert!(tracker.last_quote().is_none());
    }
}
