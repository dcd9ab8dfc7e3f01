//! Liquidity funds cap derived from mimir and network data

use super::NetworkData;
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::U256;
use std::collections::HashMap;

const MAX_LIQUIDITY_KEY: &str = "MAXIMUMLIQUIDITYRUNE";

/// Cap is considered reached at 90% of the mimir maximum
const CAP_THRESHOLD_BPS: u64 = 9_000;

/// Snapshot of the protocol's liquidity cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityCap {
    pub max_liquidity_rune: Option<U256>,
    pub total_pooled_rune: U256,
}

impl LiquidityCap {
    pub fn from_parts(network: &NetworkData, mimir: &HashMap<String, i64>) -> MultiChainResult<Self> {
        let total_pooled_rune = if network.total_pooled_rune.is_empty() {
            U256::ZERO
        } else {
            network.total_pooled_rune.parse::<U256>().map_err(|_| {
                MultiChainError::Indexer(format!(
                    "Invalid totalPooledRune: {}",
                    network.total_pooled_rune
                ))
            })?
        };

        let max_liquidity_rune = mimir
            .get(&format!("mimir//{}", MAX_LIQUIDITY_KEY))
            .or_else(|| mimir.get(MAX_LIQUIDITY_KEY))
            .filter(|value| **value > 0)
            .map(|value| U256::from(*value as u64));

        Ok(Self {
            max_liquidity_rune,
            total_pooled_rune,
        })
    }

    /// True once pooled RUNE reaches 90% of the configured maximum
    pub fn is_funds_cap_reached(&self) -> bool {
        match self.max_liquidity_rune {
            Some(max) => {
                self.total_pooled_rune * U256::from(10_000u64) >= max * U256::from(CAP_THRESHOLD_BPS)
            }
            None => false,
        }
    }
}
