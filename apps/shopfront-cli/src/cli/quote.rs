use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;

use shopfront_client::{ClientConfig, HttpStorefrontApi, ShippingQuoteKey, StorefrontApi};
use shopfront_core::validation::validate_email;
use shopfront_core::{compute_settlement, Credits, Money, PaymentMode, SettlementQuote};

use crate::input::load_cart;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Cart file: JSON array of {code, name, unitPrice, image?}, one entry per unit
    #[arg(long)]
    cart: PathBuf,

    /// Shipping cost in dollars, used when --state is not given
    #[arg(long)]
    shipping: Option<Money>,

    /// Discount code, validated against the storefront API
    #[arg(long)]
    discount_code: Option<String>,

    /// Pay with store credits
    #[arg(long)]
    credits: bool,

    /// Shopper email; fetches the credit balance from the API
    #[arg(long)]
    email: Option<String>,

    /// Destination state; fetches the shipping fee from the API
    #[arg(long)]
    state: Option<String>,

    /// Credit balance to assume when --email is not given
    #[arg(long, default_value_t = 0)]
    balance: i64,

    /// Print the quote as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) async fn run(args: QuoteArgs, config: ClientConfig) -> anyhow::Result<()> {
    let cart = load_cart(&args.cart)?;
    let api = HttpStorefrontApi::new(&config)?;

    let discount = match args.discount_code.as_deref() {
        Some(code) => Some(api.validate_discount(code.trim()).await?),
        None => None,
    };

    let shipping = match args.state.as_deref() {
        Some(state) => {
            let key = ShippingQuoteKey::new(config.origin_state(), state, cart.item_count());
            api.shipping_fee(&key.to_request())
                .await
                .context("failed to fetch shipping fee")?
        }
        None => args.shipping.unwrap_or_default(),
    };

    let balance = match args.email.as_deref() {
        Some(email) => {
            validate_email(email)?;
            api.credit_balance(email)
                .await
                .context("failed to fetch credit balance")?
        }
        None => Credits::new(args.balance),
    };

    debug!(lines = cart.item_count(), shipping = %shipping, balance = %balance, "Computing quote");
    let quote = compute_settlement(
        &cart,
        shipping,
        discount.as_ref(),
        PaymentMode::from_pay_with_credits(args.credits),
        balance,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        print_quote(&quote);
    }

    Ok(())
}

fn print_quote(quote: &SettlementQuote) {
    println!("subtotal:          {}", quote.subtotal);
    match &quote.discount_code {
        Some(code) => println!("discount ({code}):  -{}", quote.discount_amount),
        None => println!("discount:          -{}", quote.discount_amount),
    }
    println!("shipping:          {}", quote.shipping_cost);
    if quote.payment_mode.is_credits() {
        println!("credit discount:   -{}", quote.credit_discount);
    }
    println!("total:             {}", quote.order_total());
    println!("in credits:        {}", quote.payable_credits);

    if quote.payment_mode.is_credits() {
        println!("balance:           {}", quote.credit_balance);
        if let Some(shortfall) = quote.shortfall {
            println!("short by:          {shortfall}");
        }
    } else {
        println!("you will earn:     {}", quote.credits_to_earn);
    }
}
