//! THORChain adapter: memo-bearing native deposits

use super::adapter::ChainAdapter;
use super::client::{Signer, TxHash};
use crate::entities::{AssetAmount, Chain, Network};
use crate::error::{MultiChainError, MultiChainResult};

use tracing::info;

const VIEWBLOCK_BASE: &str = "https://viewblock.io/thorchain";

/// THORChain explorer links always point at viewblock
pub(crate) fn viewblock_url(network: Network, kind: &str, value: &str) -> String {
    match network {
        Network::Mainnet => format!("{}/{}/{}", VIEWBLOCK_BASE, kind, value),
        Network::Testnet => format!("{}/{}/{}?network=testnet", VIEWBLOCK_BASE, kind, value),
    }
}

#[derive(Debug)]
pub struct ThorchainAdapter {
    inner: ChainAdapter,
}

impl ThorchainAdapter {
    pub fn new(inner: ChainAdapter) -> Self {
        debug_assert_eq!(inner.chain(), Chain::Thor);
        Self { inner }
    }

    pub fn adapter(&self) -> &ChainAdapter {
        &self.inner
    }

    /// Submit a `MsgDeposit`. This is how swaps, adds and withdraws are
    /// issued on THORChain itself; it is not a user-to-user send.
    pub async fn deposit(&self, asset_amount: &AssetAmount, memo: String) -> MultiChainResult<TxHash> {
        let request = self.inner.transfer_request(asset_amount, "", Some(memo))?;

        let tx_hash = match self.inner.signer() {
            Signer::None => return Err(MultiChainError::NoSigner { chain: Chain::Thor }),
            Signer::LocalKey => self.inner.client().deposit(request).await?,
            Signer::Delegate { delegate, .. } => delegate.request_deposit(request).await?,
        };

        info!("THORChain deposit submitted: {}", tx_hash);
        Ok(tx_hash)
    }
}
