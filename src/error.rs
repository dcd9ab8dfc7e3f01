//! Error types for the multi-chain client

use crate::coordination::AddLiquidityTxns;
use crate::entities::Chain;

use thiserror::Error;

/// Main error type for multi-chain operations
#[derive(Error, Debug)]
pub enum MultiChainError {
    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid percent: {basis_points} basis points is outside (0, 100]")]
    InvalidPercent { basis_points: u32 },

    #[error("Invalid address for {chain}: {address}")]
    InvalidAddress { chain: Chain, address: String },

    #[error("Invalid memo: {0}")]
    InvalidMemo(String),

    #[error("Invalid transaction hash: {0:?}")]
    InvalidTxHash(String),

    #[error("Invalid {chain} router")]
    MissingRouter { chain: Chain },

    #[error("Insufficient fee")]
    InsufficientFee,

    #[error("Pool not found for {0}")]
    PoolNotFound(String),

    #[error("Wallet not detected")]
    WalletNotDetected,

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Wallet address not found for chain {chain}")]
    AddressNotFound { chain: Chain },

    #[error("No signer bound for chain {chain}")]
    NoSigner { chain: Chain },

    #[error("Chain client error for {chain}: {message}")]
    Chain { chain: Chain, message: String },

    #[error("Indexer error: {0}")]
    Indexer(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The second leg of a symmetric liquidity add failed after the first
    /// leg was accepted. `completed` carries the legs that went through.
    #[error("{source}")]
    SecondLegFailed {
        completed: AddLiquidityTxns,
        source: Box<MultiChainError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MultiChainError {
    /// Rejected before any network call was made
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MultiChainError::InvalidChain(_)
                | MultiChainError::InvalidAsset(_)
                | MultiChainError::InvalidAmount(_)
                | MultiChainError::InvalidPercent { .. }
                | MultiChainError::InvalidAddress { .. }
                | MultiChainError::InvalidMemo(_)
                | MultiChainError::InvalidTxHash(_)
                | MultiChainError::MissingRouter { .. }
                | MultiChainError::InsufficientFee
                | MultiChainError::PoolNotFound(_)
                | MultiChainError::WalletNotDetected
                | MultiChainError::WalletNotConnected
                | MultiChainError::AddressNotFound { .. }
                | MultiChainError::NoSigner { .. }
        )
    }

    /// Check if error came from a remote collaborator and may succeed on a
    /// later attempt. Retrying is left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MultiChainError::Chain { .. } | MultiChainError::Indexer(_) | MultiChainError::Http(_)
        )
    }

    /// A multi-leg operation committed some legs before failing
    pub fn is_partial(&self) -> bool {
        matches!(self, MultiChainError::SecondLegFailed { .. })
    }
}

/// Result type for multi-chain operations
pub type MultiChainResult<T> = Result<T, MultiChainError>;
