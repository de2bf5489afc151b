use anyhow::Result;
use clap::{Parser, Subcommand};
use extrato_core::Bank;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "extrato", version, about = "Import and categorize OFX bank statements")]
struct Cli {
    /// Config file (default: extrato.toml in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an OFX statement and print the categorized records as JSON
    Import {
        /// Path to the .ofx file
        file: PathBuf,

        /// Issuing bank: bb or c6
        #[arg(long)]
        bank: Bank,

        /// Append the records to the ledger and relearn overrides
        #[arg(long)]
        save: bool,

        #[arg(long)]
        user: Option<String>,
    },

    /// Print the stored ledger as JSON
    History {
        #[arg(long)]
        user: Option<String>,
    },

    /// Rebuild the override file from the stored ledger
    Learn {
        #[arg(long)]
        user: Option<String>,
    },

    /// List every category available for manual correction
    Categories {
        #[arg(long)]
        user: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Import {
            file,
            bank,
            save,
            user,
        } => {
            let owner = config.owner(user.as_deref());
            let records = commands::import(&config, &file, bank, save, owner).await?;
            print_json(&records)?;
        }
        Command::History { user } => {
            let owner = config.owner(user.as_deref());
            print_json(&commands::history(&config, owner).await?)?;
        }
        Command::Learn { user } => {
            let owner = config.owner(user.as_deref());
            print_json(&commands::learn(&config, owner).await?)?;
        }
        Command::Categories { user } => {
            let owner = config.owner(user.as_deref());
            print_json(&commands::categories(&config, owner).await?)?;
        }
    }

    Ok(())
}
