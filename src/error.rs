//! Error types for the claimer

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClaimError>;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Malformed address, amount or proof element
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rewards API request or response error
    #[error("Rewards API error: {0}")]
    Rewards(String),

    /// Nothing to claim for the account
    #[error("{0}")]
    NoRewards(String),

    /// No wallet account to claim for
    #[error("{0}")]
    NotConnected(String),

    /// Wallet is connected to another chain
    #[error("Wrong network: expected chain ID {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl ClaimError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ClaimError::InvalidInput(msg.into())
    }
}

impl From<config::ConfigError> for ClaimError {
    fn from(e: config::ConfigError) -> Self {
        ClaimError::Configuration(e.to_string())
    }
}
