use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::calldata::parse_address;
use crate::error::{ClaimError, Result};
use crate::provider::ProviderConfig;
use crate::rewards::RewardsClient;
use crate::session::ClaimTarget;

/// Looked up as `merkl-claim.toml` (or any other format `config` knows) in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "merkl-claim";

/// Environment overrides, e.g. `MERKL_CLAIM__NETWORK__RPC_URL`
pub const ENV_PREFIX: &str = "MERKL_CLAIM";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub claim: ClaimConfig,
    pub rewards: RewardsConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimConfig {
    pub distributor_address: String,
    pub token_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Config {
    /// Defaults, then the config file, then environment variables.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = config::Config::builder()
            // Stable Mainnet deployment
            .set_default("network.chain_id", 988_i64)?
            .set_default("network.chain_name", "Stable Mainnet")?
            .set_default("network.rpc_url", "https://rpc.stablechain.app")?
            .set_default("network.explorer_url", "https://stablescan.xyz/")?
            .set_default("network.timeout_seconds", 120_i64)?
            .set_default("claim.distributor_address", "0x3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae")?
            .set_default("claim.token_address", "0xAB067d0832D40619EF445B7fAE510f5Da606Ab0A")?
            .set_default("rewards.api_url", "https://api.merkl.xyz/v3/rewards")?
            .set_default("rewards.timeout_seconds", 30_i64)?
            .set_default("service.log_level", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.target()?;
        Ok(config)
    }

    /// Chain, distributor and token, with addresses validated
    pub fn target(&self) -> Result<ClaimTarget> {
        let distributor = parse_address(&self.claim.distributor_address)
            .map_err(|e| ClaimError::Configuration(format!("claim.distributor_address: {}", e)))?;
        let token = parse_address(&self.claim.token_address)
            .map_err(|e| ClaimError::Configuration(format!("claim.token_address: {}", e)))?;

        Ok(ClaimTarget {
            chain_id: self.network.chain_id,
            distributor,
            token,
        })
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            rpc_url: self.network.rpc_url.clone(),
            chain_id: self.network.chain_id,
            timeout_seconds: self.network.timeout_seconds,
        }
    }

    pub fn rewards_client(&self) -> Result<RewardsClient> {
        RewardsClient::new(
            self.rewards.api_url.clone(),
            Duration::from_secs(self.rewards.timeout_seconds),
        )
    }

    /// Block explorer link for a transaction hash
    pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> String {
        format!("{}/tx/{}", self.network.explorer_url.trim_end_matches('/'), tx_hash)
    }
}
