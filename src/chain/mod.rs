//! Chain module - per-chain client adapters
//!
//! This module provides:
//! - Collaborator contracts for chain clients and external wallets
//! - A uniform adapter over each chain client
//! - THORChain native deposits and Ethereum router/approval calls
//! - A total mapping from [`Chain`] to its adapter

pub mod adapter;
pub mod client;
pub mod ethereum;
pub mod thorchain;

pub use adapter::ChainAdapter;
pub use client::{
    ChainClient, ClientFactory, ContractCall, FeeContext, Fees, Signer, TransferRequest, Tx,
    TxHash, TxHistoryParams, TxParty, TxType, TxsPage, WalletDelegate,
};
pub use ethereum::EthereumAdapter;
pub use thorchain::ThorchainAdapter;

use crate::entities::{Chain, Network};

use secrecy::SecretString;
use std::collections::HashMap;
use tracing::{debug, info};

/// One adapter per supported chain, built together from one credential
#[derive(Debug)]
pub struct ChainAdapters {
    thor: ThorchainAdapter,
    bnb: ChainAdapter,
    btc: ChainAdapter,
    eth: EthereumAdapter,
    ltc: ChainAdapter,
    bch: ChainAdapter,
}

impl ChainAdapters {
    /// Build every adapter from `factory`.
    ///
    /// `phrase` is handed to the factory for local signing. `delegate_addresses`
    /// is set when an external wallet signs instead; chains missing from it get
    /// no signer.
    pub fn build(
        factory: &dyn ClientFactory,
        network: Network,
        phrase: Option<&SecretString>,
        delegate: Option<(&std::sync::Arc<dyn WalletDelegate>, &HashMap<Chain, String>)>,
    ) -> Self {
        let make = |chain: Chain| {
            let client = factory.build(chain, network, phrase);
            let signer = match (delegate, phrase) {
                (Some((delegate, addresses)), _) => match addresses.get(&chain) {
                    Some(address) => Signer::Delegate {
                        delegate: delegate.clone(),
                        address: address.clone(),
                    },
                    None => Signer::None,
                },
                (None, Some(_)) => Signer::LocalKey,
                (None, None) => Signer::None,
            };
            debug!("Built {} adapter with {:?}", chain, signer);
            ChainAdapter::new(chain, network, client, signer)
        };

        let adapters = Self {
            thor: ThorchainAdapter::new(make(Chain::Thor)),
            bnb: make(Chain::Bnb),
            btc: make(Chain::Btc),
            eth: EthereumAdapter::new(make(Chain::Eth)),
            ltc: make(Chain::Ltc),
            bch: make(Chain::Bch),
        };

        info!("Chain adapters initialized for {}", network);
        adapters
    }

    /// Adapter for `chain`
    pub fn get(&self, chain: Chain) -> &ChainAdapter {
        match chain {
            Chain::Thor => self.thor.adapter(),
            Chain::Bnb => &self.bnb,
            Chain::Btc => &self.btc,
            Chain::Eth => self.eth.adapter(),
            Chain::Ltc => &self.ltc,
            Chain::Bch => &self.bch,
        }
    }

    pub fn thorchain(&self) -> &ThorchainAdapter {
        &self.thor
    }

    pub fn ethereum(&self) -> &EthereumAdapter {
        &self.eth
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::client::MockChainClient;
    use super::*;
    use std::sync::Arc;

    /// Factory handing out pre-built clients, falling back to an addressless mock
    pub(crate) struct StaticFactory {
        pub clients: std::sync::Mutex<HashMap<Chain, Arc<dyn ChainClient>>>,
    }

    impl StaticFactory {
        pub(crate) fn new(clients: Vec<(Chain, MockChainClient)>) -> Self {
            let clients = clients
                .into_iter()
                .map(|(chain, client)| (chain, Arc::new(client) as Arc<dyn ChainClient>))
                .collect();
            Self {
                clients: std::sync::Mutex::new(clients),
            }
        }
    }

    impl ClientFactory for StaticFactory {
        fn build(
            &self,
            chain: Chain,
            _network: Network,
            _phrase: Option<&SecretString>,
        ) -> Arc<dyn ChainClient> {
            self.clients
                .lock()
                .unwrap()
                .get(&chain)
                .cloned()
                .unwrap_or_else(|| {
                    let mut client = MockChainClient::new();
                    client.expect_address().return_const(None);
                    Arc::new(client)
                })
        }
    }
}
