//! Claim session: connect a wallet, look up the claimable reward, submit the claim.
//!
//! All state lives in [`ClaimSession`] and is passed explicitly to each step.
//! Steps run one at a time; every mutating step takes `&mut self`.

use alloy_primitives::Address;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::calldata::ClaimCall;
use crate::error::{ClaimError, Result};
use crate::provider::{ensure_chain, ClaimTransaction, TransactionSubmitter, TxOutcome};
use crate::rewards::{ClaimableReward, RewardsClient};

/// Where claims go: the chain, the distributor contract and the reward token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTarget {
    pub chain_id: u64,
    pub distributor: Address,
    pub token: Address,
}

/// Source of claimable rewards for an account
#[async_trait]
pub trait RewardsSource: Send + Sync {
    async fn claimable(&self, user: Address, chain_id: u64, token: Address)
        -> Result<ClaimableReward>;
}

#[async_trait]
impl RewardsSource for RewardsClient {
    async fn claimable(
        &self,
        user: Address,
        chain_id: u64,
        token: Address,
    ) -> Result<ClaimableReward> {
        self.fetch_claimable(user, chain_id, token).await
    }
}

/// Outcome of the last step, for display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Notice(String),
    Success(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ClaimSession {
    target: ClaimTarget,
    account: Option<Address>,
    chain_id: Option<u64>,
    reward: Option<ClaimableReward>,
    status: SessionStatus,
}

impl ClaimSession {
    pub fn new(target: ClaimTarget) -> Self {
        Self {
            target,
            account: None,
            chain_id: None,
            reward: None,
            status: SessionStatus::Idle,
        }
    }

    pub fn target(&self) -> &ClaimTarget {
        &self.target
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn reward(&self) -> Option<&ClaimableReward> {
        self.reward.as_ref()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn on_target_chain(&self) -> bool {
        self.chain_id == Some(self.target.chain_id)
    }

    /// Record the wallet's account and chain. Being on another chain is not an
    /// error here, only a notice: claiming checks the chain again.
    pub async fn connect(&mut self, wallet: &dyn TransactionSubmitter) -> Result<Address> {
        let account = wallet.account();
        let chain_id = match wallet.chain_id().await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };

        self.account = Some(account);
        self.chain_id = Some(chain_id);
        info!("Connected {} on chain {}", account, chain_id);

        self.status = if self.on_target_chain() {
            SessionStatus::Idle
        } else {
            warn!("Wallet is on chain {}, expected {}", chain_id, self.target.chain_id);
            SessionStatus::Notice(format!(
                "Please switch to chain ID {}",
                self.target.chain_id
            ))
        };

        Ok(account)
    }

    /// Fetch the claimable reward for the connected account, replacing any cached one
    pub async fn refresh(&mut self, source: &dyn RewardsSource) -> Result<&ClaimableReward> {
        let account = self.require_account()?;
        self.reward = None;

        match source
            .claimable(account, self.target.chain_id, self.target.token)
            .await
        {
            Ok(reward) => {
                info!("Claimable for {}: {}", account, reward.display_amount());
                Ok(self.reward.insert(reward))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Distributor call for the cached reward
    pub fn claim_call(&self) -> Result<ClaimCall> {
        let account = self.require_account()?;
        let reward = self
            .reward
            .as_ref()
            .ok_or_else(|| ClaimError::NoRewards("No claimable reward loaded".to_string()))?;

        Ok(reward.claim_call(account))
    }

    /// `{to, data, value}` for the cached reward
    pub fn prepare_claim(&self) -> Result<ClaimTransaction> {
        let call = self.claim_call()?;
        Ok(ClaimTransaction::new(self.target.distributor, call.encode()))
    }

    /// Submit the claim and drop the cached reward once it is mined
    pub async fn claim(&mut self, wallet: &dyn TransactionSubmitter) -> Result<TxOutcome> {
        let tx = match self.prepare_claim() {
            Ok(tx) => tx,
            Err(e) => return Err(self.fail(e)),
        };

        if wallet.account() != self.require_account()? {
            return Err(self.fail(ClaimError::NotConnected(
                "Wallet account changed since connecting".to_string(),
            )));
        }

        let chain_id = match wallet.chain_id().await {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };
        self.chain_id = Some(chain_id);
        if let Err(e) = ensure_chain(chain_id, self.target.chain_id) {
            return Err(self.fail(e));
        }

        match wallet.submit(&tx).await {
            Ok(outcome) => {
                self.reward = None;
                self.status = SessionStatus::Success(format!(
                    "Transaction successful: {}",
                    outcome.tx_hash
                ));
                Ok(outcome)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn require_account(&self) -> Result<Address> {
        self.account
            .ok_or_else(|| ClaimError::NotConnected("Wallet not connected".to_string()))
    }

    fn fail(&mut self, error: ClaimError) -> ClaimError {
        self.status = SessionStatus::Failed(error.to_string());
        error
    }
}
