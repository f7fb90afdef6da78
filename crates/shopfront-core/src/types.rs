//! # Domain Types
//!
//! Cart and checkout types shared by the pricing code and the client.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │      Cart       │   │  PaymentMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code           │   │  lines (Vec)    │   │  Dollars        │       │
//! │  │  name           │   │  qty = repeats  │   │  Credits        │       │
//! │  │  unit_price     │   │  of a code      │   └─────────────────┘       │
//! │  │  image          │   └─────────────────┘                              │
//! │  └─────────────────┘                         ┌─────────────────┐       │
//! │                                              │ ShippingAddress │       │
//! │                                              │  state = dest.  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quantity by Repetition
//! The storefront adds one line per "Add to cart" click. Two mugs are two
//! `MUG-01` lines, each carrying the unit price captured when it was added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cart Line
// =============================================================================

/// One unit of a product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product code, unique per product.
    pub code: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Price at time of adding (frozen).
    pub unit_price: Money,

    /// Image URL for the cart view.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        CartLine {
            code: code.into(),
            name: name.into(),
            unit_price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered sequence of cart lines.
///
/// ## Invariants
/// - Lines keep insertion order
/// - Quantity of a product is the number of lines with its code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// A product and how many times it appears in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartGroup {
    pub line: CartLine,
    pub quantity: i64,
    pub line_total: Money,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// Adds one unit of a product.
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Removes the most recently added unit with `code`.
    ///
    /// Returns `false` if the code is not in the cart.
    pub fn remove_one(&mut self, code: &str) -> bool {
        match self.lines.iter().rposition(|l| l.code == code) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes every unit with `code`.
    pub fn remove_all(&mut self, code: &str) {
        self.lines.retain(|l| l.code != code);
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of units with `code`.
    pub fn quantity_of(&self, code: &str) -> i64 {
        self.lines.iter().filter(|l| l.code == code).count() as i64
    }

    /// Total number of units, which is what shipping is quoted on.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of unit prices over all lines.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.unit_price).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Groups lines by code in first-seen order, for the cart view.
    ///
    /// The first line of each code is the representative; its unit price is
    /// used for the displayed line total.
    pub fn grouped(&self) -> Vec<CartGroup> {
        let mut groups: Vec<CartGroup> = Vec::new();
        for line in &self.lines {
            match groups.iter_mut().find(|g| g.line.code == line.code) {
                Some(group) => {
                    group.quantity += 1;
                    group.line_total += line.unit_price;
                }
                None => groups.push(CartGroup {
                    line: line.clone(),
                    quantity: 1,
                    line_total: line.unit_price,
                }),
            }
        }
        groups
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Cart::from_lines(lines)
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// Whether the shopper pays in dollars or with store credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Dollars,
    Credits,
}

impl PaymentMode {
    pub fn from_pay_with_credits(pay_with_credits: bool) -> Self {
        if pay_with_credits {
            PaymentMode::Credits
        } else {
            PaymentMode::Dollars
        }
    }

    #[inline]
    pub fn is_credits(&self) -> bool {
        matches!(self, PaymentMode::Credits)
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

/// Where the order ships. `state` also keys the shipping-fee quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
