//! # Checkout Error Types
//!
//! Error types for everything that talks to the storefront API.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Validation     │  │   Network       │  │     Payment             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  Network        │  │  InsufficientCredits    │ │
//! │  │  InvalidDiscount│  │  Api (5xx, 429) │  │  PaymentFailure         │ │
//! │  │  EmptyCart      │  │  StaleResponse  │  │  RewardAccrualFailure   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │  Protocol       │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidConfig  │  │  Deserialization│                              │
//! │  │  InvalidUrl     │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `RewardAccrualFailure` is ever swallowed, and then only after it has
//! been logged.

use shopfront_core::{CoreError, Credits, ValidationError};
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Every failure the checkout flow can surface.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Local input validation failed.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The discount code was rejected (unknown, expired, malformed).
    #[error("Discount code {code} is not valid: {reason}")]
    InvalidDiscount { code: String, reason: String },

    /// Checkout was attempted with an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    // =========================================================================
    // Payment Errors
    // =========================================================================
    /// Paying with credits, balance does not cover the order.
    #[error("Insufficient credits: need {required}, have {available} (short by {shortfall})")]
    InsufficientCredits {
        required: Credits,
        available: Credits,
        shortfall: Credits,
    },

    /// The credit spend was rejected; the order was not created.
    #[error("Credit payment failed: {0}")]
    PaymentFailure(String),

    /// Loyalty credits could not be added after a dollar payment.
    #[error("Could not add reward credits: {0}")]
    RewardAccrualFailure(String),

    // =========================================================================
    // Network Errors
    // =========================================================================
    /// Transport failure (connect, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A newer request superseded this response; it was discarded.
    #[error("Response superseded by a newer {0} request")]
    StaleResponse(&'static str),

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Failed to decode a response body.
    #[error("Unexpected response from server: {0}")]
    Deserialization(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid API base URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientCredits {
                required,
                available,
                shortfall,
            } => CheckoutError::InsufficientCredits {
                required,
                available,
                shortfall,
            },
            CoreError::EmptyCart => CheckoutError::EmptyCart,
            CoreError::Validation(v) => CheckoutError::Validation(v),
        }
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CheckoutError::Deserialization(err.to_string())
        } else if err.is_builder() {
            CheckoutError::InvalidUrl(err.to_string())
        } else {
            CheckoutError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for CheckoutError {
    fn from(err: url::ParseError) -> Self {
        CheckoutError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic and the UI)
// =============================================================================

impl CheckoutError {
    /// Returns true if the same request may be sent again.
    ///
    /// ## Retryable Errors
    /// - Transport failures
    /// - 5xx responses and 429 Too Many Requests
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Network(_) => true,
            CheckoutError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true for errors caused by what the shopper entered.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_)
                | CheckoutError::InvalidDiscount { .. }
                | CheckoutError::EmptyCart
        )
    }

    /// Returns true if the message should be shown to the shopper as is.
    ///
    /// Server rejections (4xx) carry a message written for the shopper;
    /// transport, protocol and configuration failures do not.
    pub fn is_user_facing(&self) -> bool {
        match self {
            CheckoutError::Api { status, .. } => (400..500).contains(status) && *status != 429,
            CheckoutError::InsufficientCredits { .. } | CheckoutError::PaymentFailure(_) => true,
            other => other.is_validation_error(),
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::InvalidConfig(_)
                | CheckoutError::InvalidUrl(_)
                | CheckoutError::ConfigLoadFailed(_)
                | CheckoutError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the checkout can continue despite this error.
    ///
    /// Shipping, discount and balance lookups degrade to a stale or zero
    /// value and may be retried; reward accrual never blocks an order.
    pub fn is_non_fatal(&self) -> bool {
        self.is_retryable()
            || matches!(
                self,
                CheckoutError::RewardAccrualFailure(_) | CheckoutError::StaleResponse(_)
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::Network("connection reset".into()).is_retryable());
        assert!(CheckoutError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());
        assert!(CheckoutError::Api {
            status: 429,
            message: "slow down".into()
        }
        .is_retryable());

        assert!(!CheckoutError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!CheckoutError::PaymentFailure("rejected".into()).is_retryable());
        assert!(!CheckoutError::EmptyCart.is_retryable());
    }

    #[test]
    fn test_core_error_conversion() {
        let err: CheckoutError = CoreError::InsufficientCredits {
            required: Credits::new(30500),
            available: Credits::new(30000),
            shortfall: Credits::new(500),
        }
        .into();
        assert!(matches!(
            err,
            CheckoutError::InsufficientCredits { shortfall, .. } if shortfall == Credits::new(500)
        ));
    }

    #[test]
    fn test_api_error_shows_server_message() {
        let err = CheckoutError::Api {
            status: 404,
            message: "User not found".into(),
        };
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn test_user_facing() {
        assert!(CheckoutError::EmptyCart.is_user_facing());
        assert!(CheckoutError::Api {
            status: 400,
            message: "Invalid discount code".into()
        }
        .is_user_facing());
        assert!(!CheckoutError::Api {
            status: 500,
            message: "stack trace".into()
        }
        .is_user_facing());
        assert!(!CheckoutError::Network("reset".into()).is_user_facing());
    }

    #[test]
    fn test_non_fatal() {
        assert!(CheckoutError::RewardAccrualFailure("down".into()).is_non_fatal());
        assert!(CheckoutError::StaleResponse("shipping fee").is_non_fatal());
        assert!(!CheckoutError::PaymentFailure("no".into()).is_non_fatal());
    }
}
