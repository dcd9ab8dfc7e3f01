//! Uniform adapter over a single chain client

use super::client::{
    ChainClient, FeeContext, Fees, Signer, TransferRequest, Tx, TxHash, TxHistoryParams, TxsPage,
};
use super::thorchain;
use crate::entities::{AssetAmount, Chain, Network};
use crate::error::{MultiChainError, MultiChainResult};

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// One chain's client plus the signing path chosen when it was built.
///
/// Adapters are never mutated: a credential change builds new ones.
pub struct ChainAdapter {
    chain: Chain,
    network: Network,
    client: Arc<dyn ChainClient>,
    signer: Signer,
}

impl ChainAdapter {
    pub fn new(chain: Chain, network: Network, client: Arc<dyn ChainClient>, signer: Signer) -> Self {
        Self {
            chain,
            network,
            client,
            signer,
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub(crate) fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Address the adapter signs for
    pub fn address(&self) -> Option<String> {
        match &self.signer {
            Signer::None => None,
            Signer::LocalKey => self.client.address().filter(|a| !a.is_empty()),
            Signer::Delegate { address, .. } => Some(address.clone()),
        }
    }

    pub(crate) fn require_address(&self) -> MultiChainResult<String> {
        self.address()
            .ok_or(MultiChainError::AddressNotFound { chain: self.chain })
    }

    /// Balances for the adapter's address, gas coin first
    pub async fn balance(&self) -> MultiChainResult<Vec<AssetAmount>> {
        let address = self.require_address()?;
        let mut balances = self.client.balances(address).await?;

        balances.sort_by(|a, b| {
            b.asset
                .is_native()
                .cmp(&a.asset.is_native())
                .then_with(|| a.asset.ticker().cmp(b.asset.ticker()))
        });

        debug!("Loaded {} balances on {}", balances.len(), self.chain);
        Ok(balances)
    }

    pub fn validate_address(&self, address: &str) -> bool {
        self.client.validate_address(address)
    }

    pub fn explorer_url(&self) -> String {
        self.client.explorer_url()
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        match self.chain {
            Chain::Thor => thorchain::viewblock_url(self.network, "address", address),
            _ => self.client.explorer_address_url(address),
        }
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        match self.chain {
            Chain::Thor => thorchain::viewblock_url(self.network, "tx", tx_hash),
            chain
                if chain.is_contract_chain() && !tx_hash.to_ascii_lowercase().starts_with("0x") =>
            {
                self.client.explorer_tx_url(&format!("0x{}", tx_hash))
            }
            _ => self.client.explorer_tx_url(tx_hash),
        }
    }

    /// Fee schedule. Only Ethereum prices fees from the transaction context.
    pub async fn fees(&self, context: Option<FeeContext>) -> MultiChainResult<Fees> {
        let context = context.filter(|_| self.chain.is_contract_chain());
        self.client.fees(context).await
    }

    /// Transaction history. An empty address queries the adapter's own.
    pub async fn transactions(&self, params: TxHistoryParams) -> MultiChainResult<TxsPage> {
        let params = if params.address.is_empty() {
            TxHistoryParams {
                address: self.require_address()?,
                ..params
            }
        } else {
            params
        };

        let page = self.client.transactions(params).await?;
        debug!("Loaded {} of {} transactions on {}", page.txs.len(), page.total, self.chain);
        Ok(page)
    }

    /// Look up a single transaction by hash
    pub async fn transaction_data(&self, tx_hash: &str) -> MultiChainResult<Tx> {
        let tx_hash = tx_hash.trim();
        if tx_hash.is_empty() {
            return Err(MultiChainError::InvalidTxHash(tx_hash.to_string()));
        }
        self.client.transaction_data(tx_hash.to_string()).await
    }

    /// Plain transfer. The memo is forwarded as-is; chains without a memo
    /// field ignore it.
    pub async fn transfer(
        &self,
        asset_amount: &AssetAmount,
        recipient: &str,
        memo: Option<String>,
    ) -> MultiChainResult<TxHash> {
        let request = self.transfer_request(asset_amount, recipient, memo)?;

        let tx_hash = match &self.signer {
            Signer::None => return Err(MultiChainError::NoSigner { chain: self.chain }),
            Signer::LocalKey => self.client.transfer(request).await?,
            Signer::Delegate { delegate, .. } => {
                delegate.request_transfer(self.chain, request).await?
            }
        };

        info!("Transfer submitted on {}: {}", self.chain, tx_hash);
        Ok(tx_hash)
    }

    /// Normalise into the asset's own scale and check the chain matches
    pub(crate) fn transfer_request(
        &self,
        asset_amount: &AssetAmount,
        recipient: &str,
        memo: Option<String>,
    ) -> MultiChainResult<TransferRequest> {
        if asset_amount.asset.chain() != self.chain {
            return Err(MultiChainError::InvalidChain(format!(
                "{} cannot be sent on {}",
                asset_amount.asset, self.chain
            )));
        }

        Ok(TransferRequest {
            asset_amount: AssetAmount::new(
                asset_amount.asset.clone(),
                asset_amount.in_asset_decimals()?,
            ),
            recipient: recipient.to_string(),
            memo,
        })
    }
}

impl fmt::Debug for ChainAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainAdapter")
            .field("chain", &self.chain)
            .field("network", &self.network)
            .field("signer", &self.signer)
            .finish()
    }
}
