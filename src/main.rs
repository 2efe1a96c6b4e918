use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use merkl_claim::{
    encode_claim_hex, parse_address, select_claimable, ClaimCall, ClaimError, ClaimSession, Config,
    WalletProvider,
};

mod cli;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.service.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Command::Encode {
            user,
            amount,
            proofs,
            token,
        } => {
            let token = token.unwrap_or_else(|| config.claim.token_address.clone());
            let data = encode_claim_hex(&user, &token, &amount, &proofs)?;
            println!("{}", data);
        }
        Command::Decode { data } => {
            let call = ClaimCall::decode_hex(&data)?;

            println!("user:   {}", call.user);
            println!("token:  {}", call.token);
            println!("amount: {}", call.amount);
            println!("proof:  {} element(s)", call.proof.len());
            for (i, element) in call.proof.iter().enumerate() {
                println!("  [{}] {}", i, element);
            }
        }
        Command::Rewards { user } => {
            let user = parse_address(&user)?;
            let target = config.target()?;
            let client = config.rewards_client()?;

            let rewards = client.fetch_rewards(user).await?;
            match select_claimable(&rewards, target.chain_id, target.token) {
                Ok(reward) => {
                    println!(
                        "Claimable on {}: {}",
                        config.network.chain_name,
                        reward.display_amount()
                    );
                    println!("Proof length: {}", reward.proof.len());
                }
                Err(ClaimError::NoRewards(msg)) => println!("{}", msg),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Claim {
            private_key,
            dry_run,
        } => {
            let wallet = WalletProvider::new(config.provider_config(), &private_key)?;
            let client = config.rewards_client()?;
            let mut session = ClaimSession::new(config.target()?);

            let account = session.connect(&wallet).await?;
            println!("Connected: {}", account);

            wallet
                .ensure_network(session.target().chain_id)
                .await
                .with_context(|| {
                    format!(
                        "Switch the RPC endpoint to {} (chain ID {})",
                        config.network.chain_name,
                        session.target().chain_id
                    )
                })?;

            let reward = session.refresh(&client).await?;
            println!(
                "Available rewards: {} on {}",
                reward.display_amount(),
                config.network.chain_name
            );

            if dry_run {
                let tx = session.prepare_claim()?;
                println!("{}", serde_json::to_string_pretty(&tx)?);
                return Ok(());
            }

            let outcome = session.claim(&wallet).await?;
            info!("Claim mined with {} gas", outcome.gas_used);
            println!("Transaction successful: {}", outcome.tx_hash);
            println!("{}", config.explorer_tx_url(outcome.tx_hash));
        }
    }

    Ok(())
}
