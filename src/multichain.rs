//! Multi-chain client façade
//!
//! [`MultiChain`] owns the active [`WalletSession`] and the indexer, and
//! exposes every wallet query and protocol operation through one type.

use crate::chain::{
    ClientFactory, FeeContext, Fees, Tx, TxHash, TxHistoryParams, TxsPage, WalletDelegate,
};
use crate::config::Settings;
use crate::coordination::{
    AddLiquidityParams, AddLiquidityTxns, Orchestrator, UpgradeParams, WithdrawParams,
};
use crate::entities::{Asset, AssetAmount, Chain, Network, Pool, Swap};
use crate::error::{MultiChainError, MultiChainResult};
use crate::indexer::{Indexer, LiquidityCap, MidgardClient, PoolAddressData, PoolAddressResolver};
use crate::metrics;
use crate::tx::{TransferDispatcher, TransferIntent};
use crate::wallet::{ChainWallet, Keystore, KeystoreDecryptor, Wallet, WalletSession, WalletType};

use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Unified client over every supported chain
pub struct MultiChain {
    network: Network,
    chains: Vec<Chain>,
    factory: Arc<dyn ClientFactory>,
    indexer: Arc<dyn Indexer>,
    resolver: PoolAddressResolver,
    session: RwLock<Arc<WalletSession>>,
}

impl MultiChain {
    /// Client without credential. Queries work; transfers need
    /// [`set_phrase`](Self::set_phrase) or
    /// [`connect_external`](Self::connect_external) first.
    pub fn new(
        network: Network,
        chains: Vec<Chain>,
        factory: Arc<dyn ClientFactory>,
        indexer: Arc<dyn Indexer>,
    ) -> Self {
        let session = WalletSession::empty(factory.as_ref(), network, chains.clone());

        info!("Multi-chain client created for {} with {} chains", network, chains.len());
        Self {
            network,
            chains,
            resolver: PoolAddressResolver::new(indexer.clone()),
            factory,
            indexer,
            session: RwLock::new(Arc::new(session)),
        }
    }

    /// Client backed by the Midgard endpoints in `settings`
    pub fn from_settings(settings: &Settings, factory: Arc<dyn ClientFactory>) -> MultiChainResult<Self> {
        let indexer = MidgardClient::from_config(&settings.indexer)?;
        Ok(Self::new(
            settings.wallet.network,
            settings.wallet.chains.clone(),
            factory,
            Arc::new(indexer),
        ))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// The active session. Do not hold on to it across a credential change.
    pub async fn session(&self) -> Arc<WalletSession> {
        self.session.read().await.clone()
    }

    async fn replace_session(&self, session: WalletSession) {
        *self.session.write().await = Arc::new(session);
    }

    // Credentials

    pub async fn set_phrase(&self, phrase: SecretString) {
        let session =
            WalletSession::from_phrase(self.factory.as_ref(), self.network, self.chains.clone(), phrase);
        self.replace_session(session).await;
    }

    /// Drop the credential and rebuild every adapter without one
    pub async fn reset_clients(&self) {
        let session = WalletSession::empty(self.factory.as_ref(), self.network, self.chains.clone());
        self.replace_session(session).await;
        info!("Wallet clients reset");
    }

    /// Route all signing through an external wallet
    pub async fn connect_external(&self, delegate: Arc<dyn WalletDelegate>) -> MultiChainResult<()> {
        let session = WalletSession::from_delegate(
            self.factory.as_ref(),
            self.network,
            self.chains.clone(),
            delegate,
        )
        .await?;
        self.replace_session(session).await;
        Ok(())
    }

    pub async fn wallet_type(&self) -> WalletType {
        self.session().await.wallet_type()
    }

    /// Whether `keystore` unlocked with `password` holds the active phrase
    pub async fn validate_keystore(
        &self,
        decryptor: &dyn KeystoreDecryptor,
        keystore: &Keystore,
        password: &str,
    ) -> MultiChainResult<bool> {
        let phrase = decryptor.decrypt(keystore, password).await?;
        Ok(self.session().await.phrase_matches(&phrase))
    }

    // Wallet state

    pub async fn wallets(&self) -> Option<Arc<Wallet>> {
        self.session().await.wallet().await
    }

    pub async fn load_all_wallets(&self) -> MultiChainResult<Arc<Wallet>> {
        self.session().await.load_all().await
    }

    pub async fn wallet_by_chain(&self, chain: Chain) -> MultiChainResult<ChainWallet> {
        self.session().await.wallet_by_chain(chain).await
    }

    pub async fn wallet_address(&self, chain: Chain) -> Option<String> {
        self.session().await.address_for(chain).await
    }

    // Chain queries

    pub async fn validate_address(&self, chain: Chain, address: &str) -> bool {
        self.session().await.adapters().get(chain).validate_address(address)
    }

    pub async fn explorer_url(&self, chain: Chain) -> String {
        self.session().await.adapters().get(chain).explorer_url()
    }

    pub async fn explorer_address_url(&self, chain: Chain, address: &str) -> String {
        self.session()
            .await
            .adapters()
            .get(chain)
            .explorer_address_url(address)
    }

    pub async fn explorer_tx_url(&self, chain: Chain, tx_hash: &str) -> String {
        self.session().await.adapters().get(chain).explorer_tx_url(tx_hash)
    }

    pub async fn fees(&self, chain: Chain, context: Option<FeeContext>) -> MultiChainResult<Fees> {
        self.session().await.adapters().get(chain).fees(context).await
    }

    /// Transaction history on `chain`, defaulting to the wallet's own address
    pub async fn transactions(
        &self,
        chain: Chain,
        params: TxHistoryParams,
    ) -> MultiChainResult<TxsPage> {
        self.session().await.adapters().get(chain).transactions(params).await
    }

    pub async fn transaction_data(&self, chain: Chain, tx_hash: &str) -> MultiChainResult<Tx> {
        self.session()
            .await
            .adapters()
            .get(chain)
            .transaction_data(tx_hash)
            .await
    }

    // Indexer queries

    pub async fn pool_address(&self, chain: Chain) -> MultiChainResult<PoolAddressData> {
        self.resolver.resolve(chain).await
    }

    /// Pools of supported chains; pools on other chains are skipped
    pub async fn pools(&self) -> MultiChainResult<Vec<Pool>> {
        let details = self.indexer.pools().await?;
        let pools: Vec<Pool> = details
            .iter()
            .filter_map(|detail| match detail.to_pool() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    debug!("Skipping pool {}: {}", detail.asset, e);
                    None
                }
            })
            .collect();
        Ok(pools)
    }

    pub async fn liquidity_cap(&self) -> MultiChainResult<LiquidityCap> {
        let (network, mimir) = tokio::try_join!(self.indexer.network(), self.indexer.mimir())?;
        LiquidityCap::from_parts(&network, &mimir)
    }

    // Transfers

    /// User-to-user transfer. Never takes the deposit or router path.
    pub async fn send(
        &self,
        asset_amount: &AssetAmount,
        recipient: &str,
        memo: Option<String>,
    ) -> MultiChainResult<TxHash> {
        let session = self.session().await;
        let adapter = session.adapters().get(asset_amount.asset.chain());
        observe("send", adapter.transfer(asset_amount, recipient, memo).await)
    }

    /// Protocol transfer routed by chain: native deposit, router deposit or
    /// plain transfer
    pub async fn transfer(&self, intent: &TransferIntent, native: bool) -> MultiChainResult<TxHash> {
        let session = self.session().await;
        observe(
            "transfer",
            TransferDispatcher::new(session.adapters())
                .dispatch(intent, native)
                .await,
        )
    }

    // Operations

    pub async fn swap(&self, swap: &Swap, recipient: Option<&str>) -> MultiChainResult<TxHash> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver)
            .swap(swap, recipient)
            .await;
        observe("swap", result)
    }

    pub async fn add_liquidity(&self, params: &AddLiquidityParams) -> MultiChainResult<AddLiquidityTxns> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver)
            .add_liquidity(params)
            .await;
        observe("add_liquidity", result)
    }

    pub async fn withdraw(&self, params: &WithdrawParams) -> MultiChainResult<TxHash> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver).withdraw(params).await;
        observe("withdraw", result)
    }

    pub async fn upgrade(&self, params: &UpgradeParams) -> MultiChainResult<TxHash> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver).upgrade(params).await;
        observe("upgrade", result)
    }

    pub async fn is_asset_approved(&self, asset: &Asset) -> MultiChainResult<bool> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver)
            .is_asset_approved(asset)
            .await;
        observe("is_asset_approved", result)
    }

    pub async fn approve_asset(&self, asset: &Asset) -> MultiChainResult<Option<TxHash>> {
        let session = self.session().await;
        let result = Orchestrator::new(&session, &self.resolver)
            .approve_asset(asset)
            .await;
        observe("approve_asset", result)
    }
}

fn observe<T>(operation: &str, result: MultiChainResult<T>) -> MultiChainResult<T> {
    if let Err(e) = &result {
        metrics::record_operation_failure(operation);
        if let MultiChainError::SecondLegFailed { completed, .. } = e {
            warn!("{} left a partial result: {:?}", operation, completed);
        }
    }
    result
}
