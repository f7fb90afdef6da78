//! # Validation Module
//!
//! Input validation for checkout data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI                                                │
//! │  ├── Basic format checks (empty fields)                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Checkout (Rust)                                              │
//! │  ├── THIS MODULE: prices, discounts, address, email                    │
//! │  └── Runs before any quote or remote call                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Authoritative (discount code exists, balance, stock)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::discount::{DiscountDescriptor, DiscountKind};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ShippingAddress;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or discount code.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use shopfront_core::validation::validate_code;
///
/// assert!(validate_code("discount code", "SAVE10").is_ok());
/// assert!(validate_code("discount code", "").is_err());
/// assert!(validate_code("discount code", "SAVE 10").is_err());
/// ```
pub fn validate_code(field: &str, code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if code.len() > 64 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 64,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates the shopper's email, which keys credits and orders remotely.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be name@domain"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    Ok(())
}

/// Validates a two-letter state code used for shipping quotes.
pub fn validate_state_code(field: &str, state: &str) -> ValidationResult<()> {
    let state = state.trim();

    if state.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a two-letter state code".to_string(),
        });
    }

    Ok(())
}

/// Validates a shipping address before an order is submitted.
pub fn validate_address(address: &ShippingAddress) -> ValidationResult<()> {
    for (field, value) in [
        ("name", &address.name),
        ("street", &address.street),
        ("city", &address.city),
        ("postal code", &address.postal_code),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    }

    validate_state_code("state", &address.state)
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a unit price. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use shopfront_core::money::Money;
/// use shopfront_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a shipping quote amount.
pub fn validate_shipping_cost(cost: Money) -> ValidationResult<()> {
    if cost.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "shipping cost".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount descriptor returned by the remote API.
///
/// ## Rules
/// - Code must pass [`validate_code`]
/// - Value must not be negative
/// - Percent values must be within 0..=100
pub fn validate_discount(discount: &DiscountDescriptor) -> ValidationResult<()> {
    validate_code("discount code", &discount.code)?;

    if discount.value < Decimal::ZERO {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount value".to_string(),
        });
    }

    if discount.kind == DiscountKind::Percent && discount.value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
