//! Wallet state: credentials, per-chain addresses and balances

pub mod session;

pub use session::WalletSession;

use crate::chain::WalletDelegate;
use crate::entities::{AssetAmount, Chain};
use crate::error::MultiChainResult;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use secrecy::SecretString;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    static ref ADDRESS_PREFIX: Regex =
        Regex::new(r"^(bitcoincash|bchtest):").expect("valid address prefix pattern");
}

/// Strip chain-specific address prefixes (`bitcoincash:`, `bchtest:`)
pub fn remove_address_prefix(address: &str) -> String {
    ADDRESS_PREFIX.replace(address, "").into_owned()
}

/// Encrypted keystore blob, passed through to the decryptor untouched
pub type Keystore = serde_json::Value;

/// Decrypts a keystore to its seed phrase
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeystoreDecryptor: Send + Sync {
    async fn decrypt(&self, keystore: &Keystore, password: &str) -> MultiChainResult<SecretString>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Phrase,
    External,
}

/// Credential a session was built from
#[derive(Clone, Default)]
pub enum Credential {
    #[default]
    None,
    Phrase(SecretString),
    External(Arc<dyn WalletDelegate>),
}

impl Credential {
    pub fn wallet_type(&self) -> WalletType {
        match self {
            Credential::External(_) => WalletType::External,
            Credential::None | Credential::Phrase(_) => WalletType::Phrase,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Credential::None)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::None => f.write_str("Credential::None"),
            Credential::Phrase(_) => f.write_str("Credential::Phrase([REDACTED])"),
            Credential::External(_) => f.write_str("Credential::External"),
        }
    }
}

/// Address and balances of one chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainWallet {
    pub address: String,
    pub balance: Vec<AssetAmount>,
}

/// Read-only snapshot of every loaded chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    chains: BTreeMap<Chain, ChainWallet>,
}

impl Wallet {
    pub fn get(&self, chain: Chain) -> Option<&ChainWallet> {
        self.chains.get(&chain)
    }

    pub fn chains(&self) -> impl Iterator<Item = (&Chain, &ChainWallet)> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Copy with `chain`'s entry replaced. `None` if `chain` has no entry.
    pub(crate) fn replacing(&self, chain: Chain, wallet: ChainWallet) -> Option<Self> {
        if !self.chains.contains_key(&chain) {
            return None;
        }
        let mut chains = self.chains.clone();
        chains.insert(chain, wallet);
        Some(Self { chains })
    }
}

impl FromIterator<(Chain, ChainWallet)> for Wallet {
    fn from_iter<I: IntoIterator<Item = (Chain, ChainWallet)>>(iter: I) -> Self {
        Self {
            chains: iter.into_iter().collect(),
        }
    }
}
