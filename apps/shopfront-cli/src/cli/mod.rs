use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use shopfront_client::ClientConfig;

mod config;
mod quote;
mod submit;

#[derive(Debug, Parser)]
#[command(name = "shopfront", about = "Storefront checkout CLI", long_about = None)]
pub(crate) struct Cli {
    /// Path to client.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the settlement quote for a cart
    Quote(quote::QuoteArgs),
    /// Place an order
    Submit(submit::SubmitArgs),
    /// Show or write the client configuration
    Config(config::ConfigCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Config(command) => config::run(command, self.config),
            Commands::Quote(args) => quote::run(args, load_config(self.config)?).await,
            Commands::Submit(args) => submit::run(args, load_config(self.config)?).await,
        }
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ClientConfig> {
    ClientConfig::load(path).context("failed to load client configuration")
}
