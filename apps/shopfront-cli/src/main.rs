//! # Shopfront CLI
//!
//! Quotes and places storefront orders from the terminal.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,shopfront=debug, overridden with RUST_LOG           │
//! │                                                                         │
//! │  2. Parse Arguments (clap)                                              │
//! │                                                                         │
//! │  3. Run Command                                                         │
//! │     • quote   - settlement quote for a cart file                        │
//! │     • submit  - full checkout against the storefront API                │
//! │     • config  - show or write client.toml                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod input;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    cli::Cli::parse().run().await
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Verbose output (every request and retry)
/// - `RUST_LOG=info` - Normal output (orders, spends, rewards)
/// - `RUST_LOG=warn` - Warnings and errors only
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shopfront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
