//! Recording fakes for the chain clients, external wallet and indexer
//!
//! Every remote call is appended to a shared [`CallLog`] so tests can assert
//! on which calls happened and in what order.

#![allow(dead_code)]

use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thorswap_multichain::chain::{
    ChainClient, ClientFactory, ContractCall, FeeContext, Fees, TransferRequest, Tx, TxHash,
    TxHistoryParams, TxParty, TxType, TxsPage,
};
use thorswap_multichain::entities::{Amount, Asset, AssetAmount, Chain, Network};
use thorswap_multichain::indexer::{InboundAddress, Indexer, NetworkData, PoolDetail};
use thorswap_multichain::{MultiChain, MultiChainError, MultiChainResult};

pub const ROUTER: &str = "0xe0a63488e677151844e70623533c22007dc57c9e";
pub const ETH_VAULT: &str = "0x1111111111111111111111111111111111111111";
pub const ETH_OWNER: &str = "0x2222222222222222222222222222222222222222";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Balances,
    Transfer,
    Deposit,
    ReadContract,
    CallContract,
    History,
    Lookup,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub chain: Chain,
    pub kind: CallKind,
    pub recipient: String,
    pub memo: Option<String>,
    pub base_amount: U256,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: CallKind) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    /// Calls that submit something on chain
    pub fn submissions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    CallKind::Transfer | CallKind::Deposit | CallKind::CallContract
                )
            })
            .collect()
    }
}

/// Per-chain behaviour of the fake clients
#[derive(Debug, Clone, Default)]
pub struct FakeBehaviour {
    pub failing_balances: HashSet<Chain>,
    pub failing_submissions: HashSet<Chain>,
    pub allowance: U256,
}

pub struct FakeClient {
    chain: Chain,
    address: Option<String>,
    log: CallLog,
    behaviour: FakeBehaviour,
}

impl FakeClient {
    fn submit(&self, kind: CallKind, request: &TransferRequest) -> MultiChainResult<TxHash> {
        self.log.push(Call {
            chain: self.chain,
            kind: kind.clone(),
            recipient: request.recipient.clone(),
            memo: request.memo.clone(),
            base_amount: request.asset_amount.amount.base_amount(),
        });
        self.result(kind)
    }

    fn fake_tx(&self, hash: String, owner: &str) -> Tx {
        let amount = Amount::from_base(U256::from(1_000u64), self.chain.decimals());
        Tx {
            hash,
            asset: Asset::native(self.chain),
            from: vec![TxParty {
                address: "sender".to_string(),
                amount,
            }],
            to: vec![TxParty {
                address: owner.to_string(),
                amount,
            }],
            timestamp: 1_650_000_000,
            tx_type: TxType::Transfer,
        }
    }

    fn result(&self, kind: CallKind) -> MultiChainResult<TxHash> {
        if self.behaviour.failing_submissions.contains(&self.chain) {
            return Err(MultiChainError::Chain {
                chain: self.chain,
                message: "broadcast rejected".to_string(),
            });
        }
        Ok(format!("{}-{:?}-{}", self.chain, kind, self.log.calls().len()).to_lowercase())
    }
}

#[async_trait]
impl ChainClient for FakeClient {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    async fn balances(&self, address: String) -> MultiChainResult<Vec<AssetAmount>> {
        self.log.push(Call {
            chain: self.chain,
            kind: CallKind::Balances,
            recipient: address,
            memo: None,
            base_amount: U256::ZERO,
        });
        if self.behaviour.failing_balances.contains(&self.chain) {
            return Err(MultiChainError::Chain {
                chain: self.chain,
                message: "node unreachable".to_string(),
            });
        }
        Ok(vec![AssetAmount::from_base(Asset::native(self.chain), U256::from(1_000_000u64))])
    }

    fn validate_address(&self, address: &str) -> bool {
        !address.is_empty()
    }

    fn explorer_url(&self) -> String {
        format!("https://explorer.example/{}", self.chain.ticker().to_lowercase())
    }

    fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url(), address)
    }

    fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url(), tx_hash)
    }

    async fn fees(&self, context: Option<FeeContext>) -> MultiChainResult<Fees> {
        // context-priced fees are doubled so tests can tell them apart
        let base = if context.is_some() { 2u64 } else { 1u64 };
        let decimals = self.chain.decimals();
        Ok(Fees {
            average: Amount::from_base(U256::from(base * 100), decimals),
            fast: Amount::from_base(U256::from(base * 200), decimals),
            fastest: Amount::from_base(U256::from(base * 300), decimals),
        })
    }

    async fn transfer(&self, request: TransferRequest) -> MultiChainResult<TxHash> {
        self.submit(CallKind::Transfer, &request)
    }

    async fn deposit(&self, request: TransferRequest) -> MultiChainResult<TxHash> {
        self.submit(CallKind::Deposit, &request)
    }

    async fn transactions(&self, params: TxHistoryParams) -> MultiChainResult<TxsPage> {
        self.log.push(Call {
            chain: self.chain,
            kind: CallKind::History,
            recipient: params.address.clone(),
            memo: None,
            base_amount: U256::from(params.limit.unwrap_or_default()),
        });
        let tx = self.fake_tx(format!("{}-history", self.chain).to_lowercase(), &params.address);
        Ok(TxsPage {
            total: 1,
            txs: vec![tx],
        })
    }

    async fn transaction_data(&self, tx_hash: String) -> MultiChainResult<Tx> {
        self.log.push(Call {
            chain: self.chain,
            kind: CallKind::Lookup,
            recipient: tx_hash.clone(),
            memo: None,
            base_amount: U256::ZERO,
        });
        let owner = self.address.clone().unwrap_or_default();
        Ok(self.fake_tx(tx_hash, &owner))
    }

    async fn read_contract(&self, call: ContractCall) -> MultiChainResult<Bytes> {
        self.log.push(Call {
            chain: self.chain,
            kind: CallKind::ReadContract,
            recipient: call.to,
            memo: None,
            base_amount: call.value,
        });
        Ok(self.behaviour.allowance.to_be_bytes::<32>().to_vec().into())
    }

    async fn call_contract(&self, call: ContractCall) -> MultiChainResult<TxHash> {
        self.log.push(Call {
            chain: self.chain,
            kind: CallKind::CallContract,
            recipient: call.to,
            memo: None,
            base_amount: call.value,
        });
        self.result(CallKind::CallContract)
    }
}

/// Builds [`FakeClient`]s that derive an address only when given a phrase
pub struct FakeFactory {
    pub log: CallLog,
    pub behaviour: FakeBehaviour,
}

impl FakeFactory {
    pub fn address_for(chain: Chain) -> String {
        match chain {
            Chain::Thor => "tthor1me".to_string(),
            Chain::Bnb => "tbnb1me".to_string(),
            Chain::Btc => "tb1qme".to_string(),
            Chain::Eth => ETH_OWNER.to_string(),
            Chain::Ltc => "tltc1qme".to_string(),
            Chain::Bch => "bchtest:qqme".to_string(),
        }
    }
}

impl ClientFactory for FakeFactory {
    fn build(
        &self,
        chain: Chain,
        _network: Network,
        phrase: Option<&SecretString>,
    ) -> Arc<dyn ChainClient> {
        Arc::new(FakeClient {
            chain,
            address: phrase.map(|_| Self::address_for(chain)),
            log: self.log.clone(),
            behaviour: self.behaviour.clone(),
        })
    }
}

/// Indexer serving a fixed inbound address list and counting requests
#[derive(Default)]
pub struct FakeIndexer {
    pub inbound: Vec<InboundAddress>,
    pub requests: AtomicUsize,
}

impl FakeIndexer {
    pub fn testnet() -> Self {
        let entry = |chain: &str, address: &str, router: Option<&str>| InboundAddress {
            chain: chain.to_string(),
            pub_key: "tthorpub1vault".to_string(),
            address: address.to_string(),
            halted: false,
            router: router.map(str::to_string),
            gas_rate: Some("10".to_string()),
        };

        Self {
            inbound: vec![
                entry("BNB", "tbnb1vault", None),
                entry("BTC", "tb1qvault", None),
                entry("ETH", ETH_VAULT, Some(ROUTER)),
                entry("LTC", "tltc1qvault", None),
                entry("BCH", "qqvault", None),
            ],
            requests: AtomicUsize::new(0),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Indexer for FakeIndexer {
    async fn inbound_addresses(&self) -> MultiChainResult<Vec<InboundAddress>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.inbound.clone())
    }

    async fn pools(&self) -> MultiChainResult<Vec<PoolDetail>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            PoolDetail {
                asset: "BTC.BTC".to_string(),
                asset_depth: "100000000000".to_string(),
                rune_depth: "10000000000000".to_string(),
                status: "available".to_string(),
            },
            PoolDetail {
                asset: "DOGE.DOGE".to_string(),
                asset_depth: "1".to_string(),
                rune_depth: "1".to_string(),
                status: "staged".to_string(),
            },
        ])
    }

    async fn network(&self) -> MultiChainResult<NetworkData> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(NetworkData {
            total_pooled_rune: "500".to_string(),
            active_node_count: "4".to_string(),
        })
    }

    async fn mimir(&self) -> MultiChainResult<HashMap<String, i64>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(HashMap::from([("mimir//MAXIMUMLIQUIDITYRUNE".to_string(), 1_000i64)]))
    }
}

pub struct Harness {
    pub multichain: MultiChain,
    pub log: CallLog,
    pub indexer: Arc<FakeIndexer>,
}

/// Testnet client with every chain, logged in with a phrase
pub async fn harness(behaviour: FakeBehaviour) -> Harness {
    let log = CallLog::default();
    let factory = Arc::new(FakeFactory {
        log: log.clone(),
        behaviour,
    });
    let indexer = Arc::new(FakeIndexer::testnet());

    let multichain = MultiChain::new(
        Network::Testnet,
        Chain::ALL.to_vec(),
        factory,
        indexer.clone(),
    );
    multichain
        .set_phrase(SecretString::from("abandon ".repeat(11) + "about"))
        .await;

    Harness {
        multichain,
        log,
        indexer,
    }
}
