//! Configuration management for the multi-chain client
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::entities::{Chain, Network};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub wallet: WalletConfig,
    pub indexer: IndexerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub network: Network,
    #[serde(default = "default_chains")]
    pub chains: Vec<Chain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    pub midgard_url: String,
    pub thornode_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl IndexerConfig {
    /// Public endpoints for `network`
    pub fn for_network(network: Network) -> Self {
        let (midgard_url, thornode_url) = match network {
            Network::Mainnet => (
                "https://midgard.thorchain.info",
                "https://thornode.thorchain.info",
            ),
            Network::Testnet => (
                "https://testnet.midgard.thorchain.info",
                "https://testnet.thornode.thorchain.info",
            ),
        };

        Self {
            midgard_url: midgard_url.to_string(),
            thornode_url: thornode_url.to_string(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_chains() -> Vec<Chain> {
    Chain::ALL.to_vec()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Settings {
    /// Load settings from `MULTICHAIN_CONFIG` or `config/default.toml`
    pub fn load() -> Result<Self> {
        let config_path = env::var("MULTICHAIN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        // Substitute environment variables
        let config_str = substitute_env_vars(config_str)?;

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Defaults for `network` with every chain enabled
    pub fn for_network(network: Network) -> Self {
        Self {
            wallet: WalletConfig {
                network,
                chains: default_chains(),
            },
            indexer: IndexerConfig::for_network(network),
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.wallet.chains.is_empty() {
            anyhow::bail!("At least one chain must be enabled");
        }

        // Native deposits, withdraws and upgrades all need THORChain
        if !self.wallet.chains.contains(&Chain::Thor) {
            anyhow::bail!("THOR must be among the enabled chains");
        }

        if self.indexer.midgard_url.trim().is_empty() {
            anyhow::bail!("indexer.midgard_url is empty");
        }
        if self.indexer.thornode_url.trim().is_empty() {
            anyhow::bail!("indexer.thornode_url is empty");
        }
        if self.indexer.timeout_ms == 0 {
            tracing::warn!("indexer.timeout_ms is 0 - requests will time out immediately");
        }

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    Ok(result)
}
