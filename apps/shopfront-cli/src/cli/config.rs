use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Subcommand};

use shopfront_client::ClientConfig;

#[derive(Debug, Args)]
pub(crate) struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Print the effective configuration (file + environment)
    Show,
    /// Write a default client.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub(crate) fn run(command: ConfigCommand, path: Option<PathBuf>) -> anyhow::Result<()> {
    match command.command {
        ConfigSubcommand::Show => {
            let config = ClientConfig::load(path).context("failed to load client configuration")?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigSubcommand::Init { force } => {
            let target = path
                .or_else(ClientConfig::default_config_path)
                .context("no config directory available; pass --config")?;
            if target.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", target.display());
            }
            let written = ClientConfig::default().save(Some(target))?;
            println!("wrote {}", written.display());
            Ok(())
        }
    }
}
