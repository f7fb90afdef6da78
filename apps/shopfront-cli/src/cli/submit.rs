use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use shopfront_client::{
    apply_discount_code, refresh_balance, submit_order, CheckoutSession, ClientConfig,
    HttpStorefrontApi, OrderReceipt,
};
use shopfront_core::PaymentMode;

use crate::input::{load_address, load_cart};

#[derive(Debug, Args)]
pub(crate) struct SubmitArgs {
    /// Cart file: JSON array of {code, name, unitPrice, image?}, one entry per unit
    #[arg(long)]
    cart: PathBuf,

    /// Shopper email
    #[arg(long)]
    email: String,

    /// Address file: JSON {name, street, city, state, postalCode, country?}
    #[arg(long)]
    address: PathBuf,

    /// Pay with store credits
    #[arg(long)]
    credits: bool,

    /// Discount code, validated against the storefront API
    #[arg(long)]
    discount_code: Option<String>,

    /// Payment method recorded on the order (default: "credits" or "card")
    #[arg(long)]
    payment_method: Option<String>,
}

pub(crate) async fn run(args: SubmitArgs, config: ClientConfig) -> anyhow::Result<()> {
    let cart = load_cart(&args.cart)?;
    let address = load_address(&args.address)?;
    let api = HttpStorefrontApi::new(&config)?;

    let mut session = CheckoutSession::new(&args.email, config.origin_state())?;
    for line in cart.into_lines() {
        session.add_line(line)?;
    }
    session.set_payment_mode(PaymentMode::from_pay_with_credits(args.credits));

    refresh_balance(&api, &mut session)
        .await
        .context("failed to fetch credit balance")?;

    if let Some(code) = args.discount_code.as_deref() {
        apply_discount_code(&api, &mut session, code).await?;
    }

    let payment_method = args.payment_method.unwrap_or_else(|| {
        if args.credits {
            "credits".to_string()
        } else {
            "card".to_string()
        }
    });

    let result = submit_order(&api, &mut session, &address, &payment_method).await?;
    if let Some(reason) = &result.reward_error {
        warn!(order_id = %result.order.id, "{reason}");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&OrderReceipt::from(&result))?
    );
    Ok(())
}
