//! Supported chains and networks

use crate::error::MultiChainError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every chain the client can operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chain {
    /// THORChain, the native settlement chain
    #[serde(rename = "THOR")]
    Thor,
    #[serde(rename = "BNB")]
    Bnb,
    #[serde(rename = "BTC")]
    Btc,
    /// Ethereum, the only chain whose deposits go through a router contract
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "LTC")]
    Ltc,
    #[serde(rename = "BCH")]
    Bch,
}

impl Chain {
    pub const ALL: [Chain; 6] = [
        Chain::Thor,
        Chain::Bnb,
        Chain::Btc,
        Chain::Eth,
        Chain::Ltc,
        Chain::Bch,
    ];

    /// Ticker used in asset strings, memos and the indexer API
    pub fn ticker(&self) -> &'static str {
        match self {
            Chain::Thor => "THOR",
            Chain::Bnb => "BNB",
            Chain::Btc => "BTC",
            Chain::Eth => "ETH",
            Chain::Ltc => "LTC",
            Chain::Bch => "BCH",
        }
    }

    /// Symbol of the chain's gas coin
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Thor => "RUNE",
            Chain::Bnb => "BNB",
            Chain::Btc => "BTC",
            Chain::Eth => "ETH",
            Chain::Ltc => "LTC",
            Chain::Bch => "BCH",
        }
    }

    /// Default base-unit scale for assets on this chain
    pub fn decimals(&self) -> u8 {
        match self {
            Chain::Eth => 18,
            _ => 8,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Chain::Thor)
    }

    /// Deposits on this chain are contract calls through a router
    pub fn is_contract_chain(&self) -> bool {
        matches!(self, Chain::Eth)
    }

    /// Chains holding legacy RUNE that can be upgraded to native RUNE
    pub fn hosts_legacy_rune(&self) -> bool {
        matches!(self, Chain::Bnb | Chain::Eth)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.ticker())
    }
}

impl FromStr for Chain {
    type Err = MultiChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "THOR" | "THORCHAIN" => Ok(Chain::Thor),
            "BNB" => Ok(Chain::Bnb),
            "BTC" => Ok(Chain::Btc),
            "ETH" => Ok(Chain::Eth),
            "LTC" => Ok(Chain::Ltc),
            "BCH" => Ok(Chain::Bch),
            _ => Err(MultiChainError::InvalidChain(s.to_string())),
        }
    }
}

/// Network the clients and the indexer point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}
