//! # Error Types
//!
//! Domain-specific error types for shopfront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfront-core errors (this file)                                     │
//! │  ├── CoreError        - Settlement rule violations                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopfront-client errors (separate crate)                              │
//! │  └── CheckoutError    - Network, payment, reward failures              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → UI message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Credits;

// =============================================================================
// Core Error
// =============================================================================

/// Settlement and checkout rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The shopper chose to pay with credits but the balance does not cover
    /// the payable amount.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (pay with credits)
    ///      │
    ///      ▼
    /// payable 30500 credits, balance 30000
    ///      │
    ///      ▼
    /// InsufficientCredits { required: 30500, available: 30000, shortfall: 500 }
    ///      │
    ///      ▼
    /// UI shows: "You need 500 more credits"
    /// ```
    #[error("Insufficient credits: need {required}, have {available} (short by {shortfall})")]
    InsufficientCredits {
        required: Credits,
        available: Credits,
        shortfall: Credits,
    },

    /// An order cannot be placed for an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
