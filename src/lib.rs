//! THORChain multi-chain client
//!
//! One façade over the THOR, BNB, BTC, ETH, LTC and BCH chain clients that
//! resolves inbound addresses, builds protocol memos and sequences swaps,
//! liquidity adds, withdraws and RUNE upgrades.

pub mod chain;
pub mod config;
pub mod coordination;
pub mod entities;
pub mod error;
pub mod indexer;
pub mod memo;
pub mod metrics;
pub mod multichain;
pub mod tx;
pub mod wallet;

pub use chain::{
    ChainAdapter, ChainAdapters, ChainClient, ClientFactory, Signer, Tx, TxHash, TxHistoryParams,
    TxsPage, WalletDelegate,
};
pub use config::Settings;
pub use coordination::{
    AddLiquidityParams, AddLiquidityTxns, UpgradeParams, WithdrawFrom, WithdrawParams, WithdrawTo,
};
pub use entities::{Amount, Asset, AssetAmount, Chain, Network, Percent, Pool, Swap};
pub use error::{MultiChainError, MultiChainResult};
pub use indexer::{Indexer, LiquidityCap, MidgardClient, PoolAddressData, THORCHAIN_POOL_ADDRESS};
pub use memo::Memo;
pub use multichain::MultiChain;
pub use tx::TransferIntent;
pub use wallet::{ChainWallet, Wallet, WalletSession, WalletType};
