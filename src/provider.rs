//! Provider configuration and transaction submission
//!
//! A local private key signer stands in for the browser wallet: it knows the
//! connected account and chain, and signs and submits `{to, data, value}`.

use std::time::Duration;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClaimError, Result};

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// RPC endpoint URL (HTTP)
    pub rpc_url: String,
    /// Chain ID claims are expected on
    pub chain_id: u64,
    /// How long to wait for a receipt
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    120
}

/// Contract call handed to the wallet. `value` is always zero for claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl ClaimTransaction {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            to,
            data,
            value: U256::ZERO,
        }
    }
}

/// Mined transaction summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Anything that can sign and submit a claim for a connected account
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Connected account
    fn account(&self) -> Address;

    /// Chain the wallet is currently connected to
    async fn chain_id(&self) -> Result<u64>;

    /// Sign, send and wait for the transaction to be mined
    async fn submit(&self, tx: &ClaimTransaction) -> Result<TxOutcome>;
}

/// RPC provider with a local signer
pub struct WalletProvider {
    config: ProviderConfig,
    provider: DynProvider,
    account: Address,
}

impl WalletProvider {
    /// Create a provider that signs with `private_key`
    pub fn new(config: ProviderConfig, private_key: &str) -> Result<Self> {
        let http_url: reqwest::Url = config
            .rpc_url
            .parse()
            .map_err(|e| ClaimError::Configuration(format!("Invalid RPC URL: {}", e)))?;

        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| ClaimError::Configuration(format!("Invalid private key: {}", e)))?;
        let account = signer.address();
        info!(
            "Signing as {} via {} (chain {})",
            account, config.rpc_url, config.chain_id
        );

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(http_url)
            .erased();

        Ok(Self {
            config,
            provider,
            account,
        })
    }

    /// Fail with `WrongNetwork` unless the node reports `expected` as its chain
    pub async fn ensure_network(&self, expected: u64) -> Result<()> {
        ensure_chain(self.chain_id().await?, expected)
    }
}

/// Compare the connected chain against the expected one
pub fn ensure_chain(actual: u64, expected: u64) -> Result<()> {
    if actual != expected {
        warn!("Connected to chain {}, claims require chain {}", actual, expected);
        return Err(ClaimError::WrongNetwork { expected, actual });
    }
    Ok(())
}

#[async_trait]
impl TransactionSubmitter for WalletProvider {
    fn account(&self) -> Address {
        self.account
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ClaimError::Provider(format!("Failed to get chain ID: {}", e)))
    }

    async fn submit(&self, tx: &ClaimTransaction) -> Result<TxOutcome> {
        let request = TransactionRequest::default()
            .with_from(self.account)
            .with_to(tx.to)
            .with_input(tx.data.clone())
            .with_value(tx.value);

        debug!("Sending {} bytes of call data to {}", tx.data.len(), tx.to);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| ClaimError::Transaction(format!("Transaction failed: {}", e)))?;
        let tx_hash = *pending.tx_hash();
        info!("Claim transaction submitted: {}", tx_hash);

        let receipt = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            pending.get_receipt(),
        )
        .await
        .map_err(|_| {
            ClaimError::Transaction(format!(
                "Timed out after {}s waiting for receipt of {}",
                self.config.timeout_seconds, tx_hash
            ))
        })?
        .map_err(|e| ClaimError::Transaction(format!("Failed to get receipt: {}", e)))?;

        if !receipt.status() {
            return Err(ClaimError::Transaction(format!("Transaction {} reverted", tx_hash)));
        }

        info!(
            "Claim transaction {} mined in block {:?}, gas used {}",
            tx_hash, receipt.block_number, receipt.gas_used
        );

        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
