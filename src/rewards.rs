//! Merkl rewards API client
//!
//! The API answers `GET {api_url}?user=0x...` with unclaimed balances and
//! Merkle proofs grouped by chain ID and then by token address.

use std::collections::HashMap;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calldata::{parse_address, parse_amount, parse_proofs, ClaimCall};
use crate::error::{ClaimError, Result};

/// Per-token reward state as returned by the API. Amounts are decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    pub accumulated: String,
    pub unclaimed: String,
    pub pending: String,
    pub decimals: u8,
    pub symbol: String,
    #[serde(default)]
    pub proof: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRewards {
    #[serde(default)]
    pub campaign_data: serde_json::Value,
    #[serde(default)]
    pub token_data: HashMap<String, TokenData>,
}

/// chain ID (as a string key) -> rewards on that chain
pub type RewardsResponse = HashMap<String, ChainRewards>;

/// A validated, non-zero reward ready to be claimed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimableReward {
    pub token: Address,
    pub amount: U256,
    pub decimals: u8,
    pub symbol: String,
    pub proof: Vec<B256>,
}

impl ClaimableReward {
    /// Distributor call claiming this reward for `user`
    pub fn claim_call(&self, user: Address) -> ClaimCall {
        ClaimCall::new(user, self.token, self.amount, self.proof.clone())
    }

    /// Amount in whole token units, e.g. `1.500000 USDT`
    pub fn display_amount(&self) -> String {
        format!("{} {}", format_amount(self.amount, self.decimals), self.symbol)
    }
}

pub struct RewardsClient {
    client: Client,
    api_url: String,
}

impl RewardsClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClaimError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Fetch rewards for `user` on every chain
    pub async fn fetch_rewards(&self, user: Address) -> Result<RewardsResponse> {
        let user = user.to_checksum(None);
        info!("Fetching rewards for {} from {}", user, self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("user", user.as_str())])
            .send()
            .await
            .map_err(|e| ClaimError::Rewards(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClaimError::Rewards(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let rewards: RewardsResponse = response
            .json()
            .await
            .map_err(|e| ClaimError::Rewards(format!("JSON parsing failed: {}", e)))?;

        debug!("Rewards returned for {} chain(s)", rewards.len());
        Ok(rewards)
    }

    /// Fetch rewards and pick the claimable balance of `token` on `chain_id`
    pub async fn fetch_claimable(
        &self,
        user: Address,
        chain_id: u64,
        token: Address,
    ) -> Result<ClaimableReward> {
        let rewards = self.fetch_rewards(user).await?;
        select_claimable(&rewards, chain_id, token)
    }
}

/// Pick the unclaimed balance of `token` on `chain_id` out of an API response.
///
/// Token keys are compared as addresses, so checksum and lower-case keys both match.
pub fn select_claimable(
    rewards: &RewardsResponse,
    chain_id: u64,
    token: Address,
) -> Result<ClaimableReward> {
    let chain = rewards
        .get(&chain_id.to_string())
        .ok_or_else(|| ClaimError::NoRewards(format!("No rewards found on chain {}", chain_id)))?;

    let data = chain
        .token_data
        .iter()
        .find(|(key, _)| parse_address(key).map(|a| a == token).unwrap_or(false))
        .map(|(_, data)| data)
        .ok_or_else(|| {
            ClaimError::NoRewards(format!(
                "No rewards found for token {} on chain {}",
                token, chain_id
            ))
        })?;

    let amount = parse_amount(&data.unclaimed)?;
    if amount.is_zero() {
        return Err(ClaimError::NoRewards(format!(
            "No unclaimed {} rewards available",
            data.symbol
        )));
    }

    Ok(ClaimableReward {
        token,
        amount,
        decimals: data.decimals,
        symbol: data.symbol.clone(),
        proof: parse_proofs(&data.proof)?,
    })
}

/// Render `amount` with exactly `decimals` fractional digits
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    format!("{}.{}", whole, fraction)
}
