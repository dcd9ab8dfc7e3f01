//! Asset identifiers
//!
//! An asset is written `CHAIN.SYMBOL`. Contract-hosted tokens carry their
//! contract address in the symbol after a dash, e.g.
//! `ETH.USDT-0xdac17f958d2ee523a2206206994597c13d831ec7`.

use super::{Chain, Network};
use crate::error::MultiChainError;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const BNB_RUNE_MAINNET: &str = "RUNE-B1A";
const BNB_RUNE_TESTNET: &str = "RUNE-67C";
const ETH_RUNE: &str = "RUNE-0x3155ba85d5f96b2d030a4966af206230e46849cb";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    chain: Chain,
    symbol: String,
    ticker: String,
    decimals: u8,
}

impl Asset {
    pub fn new(chain: Chain, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let ticker = symbol.split('-').next().unwrap_or_default().to_string();

        Self {
            chain,
            symbol,
            ticker,
            decimals: chain.decimals(),
        }
    }

    /// Gas coin of `chain`
    pub fn native(chain: Chain) -> Self {
        Self::new(chain, chain.native_symbol())
    }

    /// Native RUNE on THORChain
    pub fn rune() -> Self {
        Self::native(Chain::Thor)
    }

    /// Legacy BEP2 RUNE
    pub fn bnb_rune(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::new(Chain::Bnb, BNB_RUNE_MAINNET),
            Network::Testnet => Self::new(Chain::Bnb, BNB_RUNE_TESTNET),
        }
    }

    /// Legacy ERC-20 RUNE
    pub fn eth_rune() -> Self {
        Self::new(Chain::Eth, ETH_RUNE)
    }

    /// Override the base-unit scale (ERC-20 tokens vary)
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Whether this is the gas coin of its chain
    pub fn is_native(&self) -> bool {
        self.symbol.eq_ignore_ascii_case(self.chain.native_symbol())
    }

    /// Native RUNE or one of its legacy token forms
    pub fn is_rune(&self) -> bool {
        self.ticker.eq_ignore_ascii_case("RUNE")
    }

    /// Tokens a router can only move after an allowance is granted
    pub fn requires_approval(&self) -> bool {
        self.chain.is_contract_chain() && !self.is_native()
    }

    /// EIP-55 checksummed contract address for ETH-chain tokens
    pub fn token_address(&self) -> Option<String> {
        if !self.requires_approval() {
            return None;
        }

        let (_, raw) = self.symbol.split_once('-')?;
        Address::from_str(raw)
            .ok()
            .map(|address| address.to_checksum(None))
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain && self.symbol.eq_ignore_ascii_case(&other.symbol)
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain.hash(state);
        self.symbol.to_ascii_uppercase().hash(state);
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chain, self.symbol)
    }
}

impl FromStr for Asset {
    type Err = MultiChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain, symbol) = s
            .split_once('.')
            .ok_or_else(|| MultiChainError::InvalidAsset(s.to_string()))?;

        if symbol.is_empty() {
            return Err(MultiChainError::InvalidAsset(s.to_string()));
        }

        let chain = chain
            .parse::<Chain>()
            .map_err(|_| MultiChainError::InvalidAsset(s.to_string()))?;

        Ok(Self::new(chain, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDT: &str = "ETH.USDT-0xdac17f958d2ee523a2206206994597c13d831ec7";

    #[test]
    fn test_parse_token() {
        let asset: Asset = USDT.parse().unwrap();
        assert_eq!(asset.chain(), Chain::Eth);
        assert_eq!(asset.ticker(), "USDT");
        assert_eq!(asset.decimals(), 18);
        assert!(!asset.is_native());
        assert_eq!(asset.to_string(), USDT);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("BTC".parse::<Asset>().is_err());
        assert!("BTC.".parse::<Asset>().is_err());
        assert!("DOGE.DOGE".parse::<Asset>().is_err());
    }

    #[test]
    fn test_native_assets() {
        assert!(Asset::rune().is_native());
        assert!(Asset::rune().is_rune());
        assert!(Asset::native(Chain::Eth).is_native());
        assert!(!Asset::eth_rune().is_native());
        assert!(Asset::eth_rune().is_rune());
        assert_eq!(Asset::bnb_rune(Network::Testnet).to_string(), "BNB.RUNE-67C");
    }

    #[test]
    fn test_native_check_ignores_symbol_case() {
        let lower = Asset::new(Chain::Eth, "eth");
        assert_eq!(lower, Asset::native(Chain::Eth));
        assert!(lower.is_native());
        assert!(!lower.requires_approval());
        assert!(Asset::new(Chain::Thor, "rune").is_rune());

        let usdt: Asset = USDT.parse().unwrap();
        assert!(usdt.requires_approval());
        assert!(!Asset::native(Chain::Btc).requires_approval());
    }

    #[test]
    fn test_token_address_is_checksummed() {
        let asset: Asset = USDT.parse().unwrap();
        assert_eq!(
            asset.token_address().as_deref(),
            Some("0xdAC17F958D2ee523a2206206994597C13D831ec7")
        );
        assert_eq!(Asset::native(Chain::Eth).token_address(), None);
        assert_eq!(Asset::native(Chain::Btc).token_address(), None);
    }

    #[test]
    fn test_equality_ignores_decimals() {
        let a: Asset = USDT.parse().unwrap();
        let b = a.clone().with_decimals(6);
        assert_eq!(a, b);
    }
}
