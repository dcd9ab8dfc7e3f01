//! Immutable wallet session built from one credential

use super::{remove_address_prefix, ChainWallet, Credential, Wallet, WalletType};
use crate::chain::{ChainAdapters, ClientFactory, WalletDelegate};
use crate::entities::{Chain, Network};
use crate::error::{MultiChainError, MultiChainResult};
use crate::metrics;

use futures::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Adapters bound to one credential plus the last loaded wallet snapshot.
///
/// A credential change never mutates a session; the owner builds a new one
/// and drops the old. The snapshot is the only mutable state and is always
/// swapped as a whole.
pub struct WalletSession {
    network: Network,
    credential: Credential,
    chains: Vec<Chain>,
    adapters: ChainAdapters,
    snapshot: RwLock<Option<Arc<Wallet>>>,
}

impl WalletSession {
    /// Session without credential: query-only adapters and no snapshot
    pub fn empty(factory: &dyn ClientFactory, network: Network, chains: Vec<Chain>) -> Self {
        let adapters = ChainAdapters::build(factory, network, None, None);
        Self::assemble(network, Credential::None, chains, adapters)
    }

    pub fn from_phrase(
        factory: &dyn ClientFactory,
        network: Network,
        chains: Vec<Chain>,
        phrase: SecretString,
    ) -> Self {
        let adapters = ChainAdapters::build(factory, network, Some(&phrase), None);
        info!("Wallet session created from phrase on {}", network);
        Self::assemble(network, Credential::Phrase(phrase), chains, adapters)
    }

    /// Bind every adapter to an external wallet. Chains whose address the
    /// wallet refuses to reveal are left without a signer.
    pub async fn from_delegate(
        factory: &dyn ClientFactory,
        network: Network,
        chains: Vec<Chain>,
        delegate: Arc<dyn WalletDelegate>,
    ) -> MultiChainResult<Self> {
        if !delegate.is_detected() {
            return Err(MultiChainError::WalletNotDetected);
        }

        let requests = chains.iter().map(|&chain| {
            let delegate = delegate.clone();
            async move { (chain, delegate.request_address(chain).await) }
        });

        let mut addresses = HashMap::new();
        for (chain, result) in join_all(requests).await {
            match result {
                Ok(address) => {
                    addresses.insert(chain, address);
                }
                Err(e) => warn!("External wallet gave no {} address: {}", chain, e),
            }
        }

        let adapters = ChainAdapters::build(factory, network, None, Some((&delegate, &addresses)));
        info!(
            "Wallet session created from external wallet with {} chains",
            addresses.len()
        );
        Ok(Self::assemble(
            network,
            Credential::External(delegate),
            chains,
            adapters,
        ))
    }

    fn assemble(
        network: Network,
        credential: Credential,
        chains: Vec<Chain>,
        adapters: ChainAdapters,
    ) -> Self {
        // A bound credential starts with known addresses and no balances
        let snapshot = if credential.is_empty() {
            None
        } else {
            let wallet: Wallet = chains
                .iter()
                .map(|&chain| {
                    let address = adapters.get(chain).address().unwrap_or_default();
                    (chain, ChainWallet { address, balance: vec![] })
                })
                .collect();
            Some(Arc::new(wallet))
        };

        Self {
            network,
            credential,
            chains,
            adapters,
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn wallet_type(&self) -> WalletType {
        self.credential.wallet_type()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn adapters(&self) -> &ChainAdapters {
        &self.adapters
    }

    /// Whether `phrase` equals the session's phrase
    pub fn phrase_matches(&self, phrase: &SecretString) -> bool {
        match &self.credential {
            Credential::Phrase(own) => own.expose_secret() == phrase.expose_secret(),
            _ => false,
        }
    }

    /// Current snapshot, if any
    pub async fn wallet(&self) -> Option<Arc<Wallet>> {
        self.snapshot.read().await.clone()
    }

    /// Last loaded address for `chain` with any address prefix removed
    pub async fn address_for(&self, chain: Chain) -> Option<String> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .and_then(|wallet| wallet.get(chain))
            .filter(|chain_wallet| !chain_wallet.address.is_empty())
            .map(|chain_wallet| remove_address_prefix(&chain_wallet.address))
    }

    /// Load one chain. A snapshot that already holds `chain` is replaced with
    /// the refreshed entry; other chains are never added.
    pub async fn wallet_by_chain(&self, chain: Chain) -> MultiChainResult<ChainWallet> {
        let adapter = self.adapters.get(chain);
        let balance = adapter.balance().await?;
        let chain_wallet = ChainWallet {
            address: adapter.address().unwrap_or_default(),
            balance,
        };

        let mut snapshot = self.snapshot.write().await;
        if let Some(updated) = snapshot
            .as_ref()
            .and_then(|current| current.replacing(chain, chain_wallet.clone()))
        {
            *snapshot = Some(Arc::new(updated));
        }

        Ok(chain_wallet)
    }

    /// Load every configured chain concurrently.
    ///
    /// A failing chain is logged and recorded with an empty balance. The
    /// snapshot is replaced once every chain has settled.
    pub async fn load_all(&self) -> MultiChainResult<Arc<Wallet>> {
        if self.credential.is_empty() {
            return Err(MultiChainError::WalletNotConnected);
        }

        let loads = self.chains.iter().map(|&chain| async move {
            let adapter = self.adapters.get(chain);
            (chain, adapter.address(), adapter.balance().await)
        });

        let wallet: Wallet = join_all(loads)
            .await
            .into_iter()
            .map(|(chain, address, result)| {
                let balance = match result {
                    Ok(balance) => balance,
                    Err(e) => {
                        warn!("Failed to load {} wallet: {}", chain, e);
                        metrics::record_wallet_load_failure(chain);
                        vec![]
                    }
                };
                let address = address.unwrap_or_default();
                (chain, ChainWallet { address, balance })
            })
            .collect();

        debug!("Loaded wallet for {} chains", wallet.len());

        let wallet = Arc::new(wallet);
        *self.snapshot.write().await = Some(wallet.clone());
        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::client::{MockChainClient, MockWalletDelegate};
    use crate::chain::testing::StaticFactory;
    use crate::entities::{Asset, AssetAmount};
    use alloy_primitives::U256;

    fn phrase() -> SecretString {
        SecretString::from("abandon ".repeat(11) + "about")
    }

    fn client(address: &str, balance: Option<u64>) -> MockChainClient {
        let mut client = MockChainClient::new();
        client.expect_address().return_const(Some(address.to_string()));
        client.expect_balances().returning(move |_| match balance {
            Some(amount) => Ok(vec![AssetAmount::from_base(Asset::native(Chain::Btc), U256::from(amount))]),
            None => Err(MultiChainError::Chain {
                chain: Chain::Btc,
                message: "node unreachable".into(),
            }),
        });
        client
    }

    #[tokio::test]
    async fn test_load_all_without_credential_is_rejected() {
        let factory = StaticFactory::new(vec![]);
        let session = WalletSession::empty(&factory, Network::Testnet, Chain::ALL.to_vec());

        assert!(session.wallet().await.is_none());
        assert!(matches!(
            session.load_all().await,
            Err(MultiChainError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_phrase_session_starts_with_addresses() {
        let factory = StaticFactory::new(vec![(Chain::Bch, client("bchtest:qq123", Some(1)))]);
        let session = WalletSession::from_phrase(&factory, Network::Testnet, vec![Chain::Bch], phrase());

        assert_eq!(session.wallet_type(), WalletType::Phrase);
        assert_eq!(session.address_for(Chain::Bch).await.as_deref(), Some("qq123"));
        assert_eq!(session.address_for(Chain::Eth).await, None);
        assert!(session.phrase_matches(&phrase()));
        assert!(!session.phrase_matches(&SecretString::from("other")));
    }

    #[tokio::test]
    async fn test_one_failing_chain_does_not_abort_load_all() {
        let factory = StaticFactory::new(vec![
            (Chain::Btc, client("bc1qok", Some(5_000))),
            (Chain::Ltc, client("ltc1qbroken", None)),
        ]);
        let session =
            WalletSession::from_phrase(&factory, Network::Mainnet, vec![Chain::Btc, Chain::Ltc], phrase());

        let wallet = session.load_all().await.unwrap();

        let btc = wallet.get(Chain::Btc).unwrap();
        assert_eq!(btc.balance.len(), 1);
        let ltc = wallet.get(Chain::Ltc).unwrap();
        assert!(ltc.balance.is_empty());
        assert_eq!(ltc.address, "ltc1qbroken");

        let current = session.wallet().await.unwrap();
        assert!(Arc::ptr_eq(&current, &wallet));
    }

    #[tokio::test]
    async fn test_wallet_by_chain_replaces_snapshot() {
        let factory = StaticFactory::new(vec![(Chain::Btc, client("bc1qme", Some(42)))]);
        let session =
            WalletSession::from_phrase(&factory, Network::Mainnet, vec![Chain::Btc, Chain::Eth], phrase());

        let before = session.wallet().await.unwrap();
        let loaded = session.wallet_by_chain(Chain::Btc).await.unwrap();
        let after = session.wallet().await.unwrap();

        assert_eq!(loaded.balance.len(), 1);
        assert!(before.get(Chain::Btc).unwrap().balance.is_empty());
        assert_eq!(after.get(Chain::Btc), Some(&loaded));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_wallet_by_chain_never_adds_unconfigured_chain() {
        let factory = StaticFactory::new(vec![
            (Chain::Btc, client("bc1qme", Some(1))),
            (Chain::Ltc, client("ltc1qme", Some(5))),
        ]);
        let session = WalletSession::from_phrase(&factory, Network::Mainnet, vec![Chain::Btc], phrase());

        let before = session.wallet().await.unwrap();
        let loaded = session.wallet_by_chain(Chain::Ltc).await.unwrap();
        let after = session.wallet().await.unwrap();

        assert_eq!(loaded.address, "ltc1qme");
        assert!(after.get(Chain::Ltc).is_none());
        assert_eq!(after.len(), 1);
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_undetected_external_wallet_is_rejected() {
        let mut delegate = MockWalletDelegate::new();
        delegate.expect_is_detected().return_const(false);
        delegate.expect_request_address().never();

        let factory = StaticFactory::new(vec![]);
        let result = WalletSession::from_delegate(
            &factory,
            Network::Testnet,
            Chain::ALL.to_vec(),
            Arc::new(delegate),
        )
        .await;
        assert!(matches!(result, Err(MultiChainError::WalletNotDetected)));
    }

    #[tokio::test]
    async fn test_external_wallet_addresses_fill_snapshot() {
        let mut delegate = MockWalletDelegate::new();
        delegate.expect_is_detected().return_const(true);
        delegate.expect_request_address().returning(|chain| match chain {
            Chain::Thor => Ok("tthor1delegate".to_string()),
            _ => Err(MultiChainError::Chain {
                chain,
                message: "rejected".into(),
            }),
        });

        let factory = StaticFactory::new(vec![]);
        let session = WalletSession::from_delegate(
            &factory,
            Network::Testnet,
            vec![Chain::Thor, Chain::Btc],
            Arc::new(delegate),
        )
        .await
        .unwrap();

        assert_eq!(session.wallet_type(), WalletType::External);
        assert_eq!(session.address_for(Chain::Thor).await.as_deref(), Some("tthor1delegate"));
        assert_eq!(session.address_for(Chain::Btc).await, None);
    }
}
