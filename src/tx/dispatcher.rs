//! Routes an intended transfer to the right submission path

use crate::chain::{ChainAdapters, TxHash};
use crate::entities::{AssetAmount, Chain};
use crate::error::{MultiChainError, MultiChainResult};
use crate::indexer::THORCHAIN_POOL_ADDRESS;
use crate::metrics;

use tracing::{debug, error};

/// A transfer the orchestrator wants on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub asset_amount: AssetAmount,
    pub recipient: String,
    pub memo: String,
    pub router: Option<String>,
}

impl TransferIntent {
    pub fn new(asset_amount: AssetAmount, recipient: impl Into<String>, memo: impl Into<String>) -> Self {
        Self {
            asset_amount,
            recipient: recipient.into(),
            memo: memo.into(),
            router: None,
        }
    }

    pub fn with_router(mut self, router: Option<String>) -> Self {
        self.router = router;
        self
    }

    pub fn chain(&self) -> Chain {
        self.asset_amount.asset.chain()
    }
}

/// Submission path chosen for an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// THORChain `MsgDeposit`
    NativeDeposit,
    /// `router.deposit(...)` on Ethereum
    RouterDeposit { router: String },
    /// Plain chain transfer with the memo attached
    Transfer,
}

impl Route {
    pub fn kind(&self) -> &'static str {
        match self {
            Route::NativeDeposit => "deposit",
            Route::RouterDeposit { .. } => "router_deposit",
            Route::Transfer => "transfer",
        }
    }
}

/// Pick the submission path. Makes no calls.
pub fn route(intent: &TransferIntent, native_deposit: bool) -> MultiChainResult<Route> {
    match intent.chain() {
        Chain::Thor if native_deposit && intent.recipient == THORCHAIN_POOL_ADDRESS => {
            Ok(Route::NativeDeposit)
        }
        chain if chain.is_contract_chain() => match intent.router.as_deref() {
            Some(router) if !router.is_empty() => Ok(Route::RouterDeposit {
                router: router.to_string(),
            }),
            _ => Err(MultiChainError::MissingRouter { chain }),
        },
        _ => Ok(Route::Transfer),
    }
}

/// Executes intents against one set of adapters
pub struct TransferDispatcher<'a> {
    adapters: &'a ChainAdapters,
}

impl<'a> TransferDispatcher<'a> {
    pub fn new(adapters: &'a ChainAdapters) -> Self {
        Self { adapters }
    }

    pub async fn dispatch(
        &self,
        intent: &TransferIntent,
        native_deposit: bool,
    ) -> MultiChainResult<TxHash> {
        let chain = intent.chain();
        let route = route(intent, native_deposit)?;
        debug!(
            "Dispatching {} to {:?} via {}",
            intent.asset_amount,
            intent.recipient,
            route.kind()
        );

        let result = match &route {
            Route::NativeDeposit => {
                self.adapters
                    .thorchain()
                    .deposit(&intent.asset_amount, intent.memo.clone())
                    .await
            }
            Route::RouterDeposit { router } => {
                self.adapters
                    .ethereum()
                    .deposit(&intent.asset_amount, &intent.recipient, &intent.memo, router)
                    .await
            }
            Route::Transfer => {
                self.adapters
                    .get(chain)
                    .transfer(&intent.asset_amount, &intent.recipient, Some(intent.memo.clone()))
                    .await
            }
        };

        match &result {
            Ok(_) => metrics::record_transfer(chain, route.kind()),
            Err(e) => {
                error!("{} submission on {} failed: {}", route.kind(), chain, e);
                metrics::record_transfer_failed(chain, route.kind());
            }
        }
        result
    }
}
