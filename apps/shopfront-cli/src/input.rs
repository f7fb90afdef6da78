//! Reading cart and address files.

use std::path::Path;

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;

use shopfront_core::validation::{validate_address, validate_unit_price};
use shopfront_core::{Cart, CartLine, ShippingAddress};

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {what} file {}", path.display()))
}

/// Loads a cart: a JSON array of lines, one per unit.
pub(crate) fn load_cart(path: &Path) -> anyhow::Result<Cart> {
    let lines: Vec<CartLine> = read_json(path, "cart")?;
    if lines.is_empty() {
        bail!("cart file {} has no lines", path.display());
    }
    for line in &lines {
        validate_unit_price(line.unit_price)
            .with_context(|| format!("line {} has an invalid price", line.code))?;
    }
    Ok(Cart::from_lines(lines))
}

pub(crate) fn load_address(path: &Path) -> anyhow::Result<ShippingAddress> {
    let address: ShippingAddress = read_json(path, "address")?;
    validate_address(&address).context("invalid shipping address")?;
    Ok(address)
}
