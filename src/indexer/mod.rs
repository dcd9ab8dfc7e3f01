//! Indexing service access
//!
//! Midgard serves pool and inbound-address data, THORNode serves mimir
//! (protocol parameter) values. Both sit behind the [`Indexer`] trait.

pub mod caps;
pub mod midgard;
pub mod resolver;

pub use caps::LiquidityCap;
pub use midgard::MidgardClient;
pub use resolver::{PoolAddressData, PoolAddressResolver, THORCHAIN_POOL_ADDRESS};

use crate::entities::{Asset, Chain, Pool};
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::U256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of Midgard's `/v2/thorchain/inbound_addresses`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundAddress {
    pub chain: String,
    #[serde(default)]
    pub pub_key: String,
    pub address: String,
    #[serde(default)]
    pub halted: bool,
    #[serde(default)]
    pub router: Option<String>,
    #[serde(default)]
    pub gas_rate: Option<String>,
}

/// One entry of Midgard's `/v2/pools`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetail {
    pub asset: String,
    pub asset_depth: String,
    pub rune_depth: String,
    #[serde(default)]
    pub status: String,
}

impl PoolDetail {
    pub fn to_pool(&self) -> MultiChainResult<Pool> {
        let asset: Asset = self.asset.parse()?;
        let depth = |value: &str| {
            value
                .parse::<U256>()
                .map_err(|_| MultiChainError::Indexer(format!("Invalid pool depth: {}", value)))
        };

        Ok(Pool::new(asset, depth(&self.asset_depth)?, depth(&self.rune_depth)?))
    }
}

/// Subset of Midgard's `/v2/network`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkData {
    #[serde(default)]
    pub total_pooled_rune: String,
    #[serde(default)]
    pub active_node_count: String,
}

/// Query API of the indexing service. Errors are returned unchanged; no
/// retries happen at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn inbound_addresses(&self) -> MultiChainResult<Vec<InboundAddress>>;

    /// Inbound address of a single chain, fetched with one request
    async fn inbound_address(&self, chain: Chain) -> MultiChainResult<InboundAddress> {
        self.inbound_addresses()
            .await?
            .into_iter()
            .find(|inbound| {
                inbound
                    .chain
                    .parse::<Chain>()
                    .map(|c| c == chain)
                    .unwrap_or(false)
            })
            .ok_or_else(|| MultiChainError::Indexer(format!("No inbound address for {}", chain)))
    }

    async fn pools(&self) -> MultiChainResult<Vec<PoolDetail>>;

    async fn network(&self) -> MultiChainResult<NetworkData>;

    async fn mimir(&self) -> MultiChainResult<HashMap<String, i64>>;
}
