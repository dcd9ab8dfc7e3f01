//! Collaborator contracts for per-chain clients and external wallets
//!
//! Signing and chain queries live outside this crate. A [`ChainClient`] is
//! the low-level client for one chain, built by a [`ClientFactory`] from the
//! active credential. A [`WalletDelegate`] is an external wallet that signs
//! on the user's behalf.

use crate::entities::{Amount, Asset, AssetAmount, Chain, Network};
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;

/// Transaction identifier as returned by the remote chain
pub type TxHash = String;

/// A transfer handed to a chain client. The amount is always in the
/// asset's own base-unit scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub asset_amount: AssetAmount,
    pub recipient: String,
    pub memo: Option<String>,
}

/// Raw EVM call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: String,
    pub value: U256,
    pub data: Bytes,
}

/// Transaction context some chains use to price fees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeContext {
    pub asset_amount: AssetAmount,
    pub recipient: String,
}

/// Fee schedule in the chain's gas asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fees {
    pub average: Amount,
    pub fast: Amount,
    pub fastest: Amount,
}

/// Transaction history query. An empty `address` means the adapter's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxHistoryParams {
    pub address: String,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    /// Unix seconds
    pub start_time: Option<u64>,
    /// Restrict to one asset (ERC-20 / BEP2 tokens)
    pub asset: Option<Asset>,
}

impl TxHistoryParams {
    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Transfer,
    Unknown,
}

/// One side of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParty {
    pub address: String,
    pub amount: Amount,
}

/// A transaction as reported by the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub hash: TxHash,
    pub asset: Asset,
    pub from: Vec<TxParty>,
    pub to: Vec<TxParty>,
    /// Unix seconds
    pub timestamp: u64,
    pub tx_type: TxType,
}

/// One page of history plus the total number of matching transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxsPage {
    pub total: u64,
    pub txs: Vec<Tx>,
}

/// Low-level signing/query client for one chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address derived from the bound credential, if any
    fn address(&self) -> Option<String>;

    async fn balances(&self, address: String) -> MultiChainResult<Vec<AssetAmount>>;

    fn validate_address(&self, address: &str) -> bool;

    fn explorer_url(&self) -> String;

    fn explorer_address_url(&self, address: &str) -> String;

    fn explorer_tx_url(&self, tx_hash: &str) -> String;

    async fn fees(&self, context: Option<FeeContext>) -> MultiChainResult<Fees>;

    async fn transfer(&self, request: TransferRequest) -> MultiChainResult<TxHash>;

    async fn transactions(&self, _params: TxHistoryParams) -> MultiChainResult<TxsPage> {
        Err(MultiChainError::Unsupported("transactions".to_string()))
    }

    async fn transaction_data(&self, _tx_hash: String) -> MultiChainResult<Tx> {
        Err(MultiChainError::Unsupported("transaction_data".to_string()))
    }

    /// Native memo-bearing deposit (THORChain `MsgDeposit`)
    async fn deposit(&self, _request: TransferRequest) -> MultiChainResult<TxHash> {
        Err(MultiChainError::Unsupported("deposit".to_string()))
    }

    /// Read-only EVM call
    async fn read_contract(&self, _call: ContractCall) -> MultiChainResult<Bytes> {
        Err(MultiChainError::Unsupported("read_contract".to_string()))
    }

    /// Signed EVM call
    async fn call_contract(&self, _call: ContractCall) -> MultiChainResult<TxHash> {
        Err(MultiChainError::Unsupported("call_contract".to_string()))
    }
}

/// Builds chain clients bound to a credential.
///
/// Must not fail for an empty credential: such a client has no address but
/// still answers fee and explorer queries.
pub trait ClientFactory: Send + Sync {
    fn build(
        &self,
        chain: Chain,
        network: Network,
        phrase: Option<&SecretString>,
    ) -> Arc<dyn ChainClient>;
}

/// External wallet that holds the keys and signs on request
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletDelegate: Send + Sync {
    fn is_detected(&self) -> bool;

    async fn request_address(&self, chain: Chain) -> MultiChainResult<String>;

    async fn request_transfer(
        &self,
        chain: Chain,
        request: TransferRequest,
    ) -> MultiChainResult<TxHash>;

    async fn request_deposit(&self, request: TransferRequest) -> MultiChainResult<TxHash>;

    async fn request_contract_call(&self, call: ContractCall) -> MultiChainResult<TxHash>;
}

/// Signing path bound into an adapter at construction
#[derive(Clone)]
pub enum Signer {
    /// Empty credential: queries only
    None,
    /// The chain client signs with its phrase-derived key
    LocalKey,
    /// Requests are forwarded to an external wallet
    Delegate {
        delegate: Arc<dyn WalletDelegate>,
        address: String,
    },
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signer::None => f.write_str("Signer::None"),
            Signer::LocalKey => f.write_str("Signer::LocalKey"),
            Signer::Delegate { address, .. } => f
                .debug_struct("Signer::Delegate")
                .field("address", address)
                .finish(),
        }
    }
}
