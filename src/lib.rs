//! Merkl distributor reward claimer
//!
//! Looks up unclaimed rewards and their Merkle proofs from the Merkl rewards
//! API, builds call data for the distributor's
//! `claim(address[],address[],uint256[],bytes32[][])` entry point by hand, and
//! submits it from a local signer.
//!
//! # Example
//!
//! ```rust
//! use merkl_claim::encode_claim_hex;
//!
//! let data = encode_claim_hex(
//!     "0x1111111111111111111111111111111111111111",
//!     "0xAB067d0832D40619EF445B7fAE510f5Da606Ab0A",
//!     "1000000",
//!     &[format!("0x{}", "aa".repeat(32))],
//! )?;
//! assert!(data.starts_with("0x71ee95c0"));
//! # Ok::<(), merkl_claim::ClaimError>(())
//! ```

pub mod calldata;
pub mod config;
pub mod error;
pub mod provider;
pub mod rewards;
pub mod session;

pub use calldata::{
    encode_claim_hex, parse_address, parse_amount, parse_proof, parse_proofs, ClaimCall,
    CLAIM_SELECTOR,
};
pub use config::Config;
pub use error::{ClaimError, Result};
pub use provider::{ClaimTransaction, ProviderConfig, TransactionSubmitter, TxOutcome, WalletProvider};
pub use rewards::{format_amount, select_claimable, ClaimableReward, RewardsClient, RewardsResponse, TokenData};
pub use session::{ClaimSession, ClaimTarget, RewardsSource, SessionStatus};

pub use alloy_primitives::{Address, Bytes, B256, U256};
