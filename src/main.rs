//! `pair-analyzer` command line front end.
//!
//! Loads `.env`, the config directory (or the built-in chains), and runs one
//! engine operation, printing the result as JSON.

use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pair_analyzer::{
    blockchain::HttpClientFactory,
    config::Config,
    PairEngine,
};

#[derive(Parser, Debug)]
#[command(name = "pair-analyzer", version, about = "Analyze V2 pairs and swap native tokens on EVM chains")]
struct Cli {
    /// Directory holding chains.json and the optional engine.json
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show reserves, price and liquidity for a token's native pair
    Analyze {
        token: String,
        #[arg(long, default_value = "sepolia")]
        chain: String,
    },
    /// Swap an amount of the native asset for a token
    Swap {
        token: String,
        amount: String,
        #[arg(long, default_value = "sepolia")]
        chain: String,
    },
    /// Check the RPC endpoint and factory deployment of a chain
    TestChain {
        #[arg(long, default_value = "sepolia")]
        chain: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("ethers_providers=warn".parse()?)
        .add_directive("ethers=warn".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_builtin(&cli.config_dir).await?;
    info!(chains = ?config.registry.chain_keys(), "Configuration loaded successfully");

    let chain_for_key = match &cli.command {
        Command::Analyze { chain, .. } | Command::Swap { chain, .. } | Command::TestChain { chain } => chain.clone(),
    };
    let engine = PairEngine::new(
        Arc::new(config.registry),
        config.settings,
        Arc::new(HttpClientFactory::new()),
    )
    .with_credential(Config::get_private_key(&chain_for_key));

    let output = match cli.command {
        Command::Analyze { token, chain } => engine
            .analyze(&token, &chain)
            .await
            .map(serde_json::to_value),
        Command::Swap { token, amount, chain } => engine
            .swap(&token, &chain, &amount)
            .await
            .map(serde_json::to_value),
        Command::TestChain { chain } => engine
            .test_chain(&chain)
            .await
            .map(serde_json::to_value),
    };

    match output {
        Ok(value) => {
            let value = value.context("Failed to serialize result")?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Operation failed");
            Err(e).context("Operation failed")
        }
    }
}
