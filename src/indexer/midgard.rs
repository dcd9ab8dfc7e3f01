//! HTTP client for Midgard and THORNode

use super::{InboundAddress, Indexer, NetworkData, PoolDetail};
use crate::config::IndexerConfig;
use crate::error::{MultiChainError, MultiChainResult};
use crate::metrics;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Indexer backed by the public Midgard and THORNode REST APIs
#[derive(Debug, Clone)]
pub struct MidgardClient {
    client: Client,
    midgard_url: String,
    thornode_url: String,
}

impl MidgardClient {
    pub fn new(midgard_url: &str, thornode_url: &str, timeout_ms: u64) -> MultiChainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("thorswap-multichain/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            midgard_url: midgard_url.trim_end_matches('/').to_string(),
            thornode_url: thornode_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &IndexerConfig) -> MultiChainResult<Self> {
        Self::new(&config.midgard_url, &config.thornode_url, config.timeout_ms)
    }

    pub fn midgard_url(&self) -> &str {
        &self.midgard_url
    }

    /// GET `url`, counting any failure against `endpoint`
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: String) -> MultiChainResult<T> {
        let result = self.fetch(&url).await;
        if let Err(e) = &result {
            warn!("Indexer request to {} failed: {}", url, e);
            metrics::record_indexer_failure(endpoint);
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> MultiChainResult<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MultiChainError::Indexer(format!("{} returned {}", url, status)));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Indexer for MidgardClient {
    async fn inbound_addresses(&self) -> MultiChainResult<Vec<InboundAddress>> {
        self.get_json(
            "inbound_addresses",
            format!("{}/v2/thorchain/inbound_addresses", self.midgard_url),
        )
        .await
    }

    async fn pools(&self) -> MultiChainResult<Vec<PoolDetail>> {
        self.get_json("pools", format!("{}/v2/pools", self.midgard_url))
            .await
    }

    async fn network(&self) -> MultiChainResult<NetworkData> {
        self.get_json("network", format!("{}/v2/network", self.midgard_url))
            .await
    }

    async fn mimir(&self) -> MultiChainResult<HashMap<String, i64>> {
        self.get_json("mimir", format!("{}/thorchain/mimir", self.thornode_url))
            .await
    }
}
