//! Multi-step protocol operations: swap, add liquidity, withdraw, upgrade
//! and ERC-20 approval.
//!
//! Each operation resolves the inbound address, builds the memo and hands a
//! [`TransferIntent`] to the dispatcher. Preconditions are checked before
//! the first network call.

use super::params::{
    AddLiquidityParams, AddLiquidityTxns, LiquidityPlan, UpgradeParams, WithdrawParams,
};
use crate::chain::TxHash;
use crate::entities::{Asset, AssetAmount, Chain, Swap};
use crate::error::{MultiChainError, MultiChainResult};
use crate::indexer::{PoolAddressResolver, THORCHAIN_POOL_ADDRESS};
use crate::memo::Memo;
use crate::tx::{TransferDispatcher, TransferIntent};
use crate::wallet::WalletSession;

use tracing::{debug, error, info};

/// Runs operations against one wallet session
pub struct Orchestrator<'a> {
    session: &'a WalletSession,
    resolver: &'a PoolAddressResolver,
}

impl<'a> Orchestrator<'a> {
    pub fn new(session: &'a WalletSession, resolver: &'a PoolAddressResolver) -> Self {
        Self { session, resolver }
    }

    fn dispatcher(&self) -> TransferDispatcher<'_> {
        TransferDispatcher::new(self.session.adapters())
    }

    /// Swap `swap.input_amount` into `swap.output_asset`, paid out to
    /// `recipient` or to this wallet's address on the output chain.
    pub async fn swap(&self, swap: &Swap, recipient: Option<&str>) -> MultiChainResult<TxHash> {
        if self.session.wallet().await.is_none() {
            return Err(MultiChainError::WalletNotConnected);
        }

        let output_chain = swap.output_asset().chain();
        let wallet_address = self
            .session
            .address_for(output_chain)
            .await
            .ok_or(MultiChainError::AddressNotFound {
                chain: output_chain,
            })?;

        if swap.has_insufficient_fee() {
            return Err(MultiChainError::InsufficientFee);
        }

        let recipient = recipient
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or(wallet_address);

        let memo = Memo::swap(swap.output_asset(), &recipient, Some(swap.min_output_amount()))?;
        let pool = self.resolver.resolve(swap.input_asset().chain()).await?;

        info!(
            "Swapping {} to {} for {}",
            swap.input_amount(),
            swap.output_asset(),
            recipient
        );

        let intent = TransferIntent::new(swap.input_amount().clone(), pool.address, memo)
            .with_router(pool.router);
        self.dispatcher().dispatch(&intent, true).await
    }

    /// Add liquidity.
    ///
    /// A symmetric add is two independent transactions: the asset leg is
    /// awaited first, then the RUNE leg. When the RUNE leg fails the asset
    /// leg is NOT reverted; the error is [`MultiChainError::SecondLegFailed`]
    /// and carries the asset leg's hash. The caller is left with a
    /// single-sided deposit and must decide what to do with it.
    pub async fn add_liquidity(
        &self,
        params: &AddLiquidityParams,
    ) -> MultiChainResult<AddLiquidityTxns> {
        let plan = params.plan()?;
        let pool_asset = &params.pool_asset;
        let chain = pool_asset.chain();

        match plan {
            LiquidityPlan::Symmetric {
                asset_amount,
                rune_amount,
            } => {
                let asset_address = self.session.address_for(chain).await.unwrap_or_default();
                let thor_address = self.session.address_for(Chain::Thor).await.unwrap_or_default();

                let pool = self.resolver.resolve(chain).await?;
                let asset_intent = TransferIntent::new(
                    asset_amount,
                    pool.address,
                    Memo::deposit(pool_asset, Some(&thor_address)),
                )
                .with_router(pool.router);
                let asset_tx = self.dispatcher().dispatch(&asset_intent, true).await?;
                debug!("Asset leg of {} add submitted: {}", pool_asset, asset_tx);

                let rune_intent = TransferIntent::new(
                    rune_amount,
                    THORCHAIN_POOL_ADDRESS,
                    Memo::deposit(pool_asset, Some(&asset_address)),
                );
                match self.dispatcher().dispatch(&rune_intent, true).await {
                    Ok(rune_tx) => {
                        info!("Symmetric add to {} submitted", pool_asset);
                        Ok(AddLiquidityTxns {
                            asset_tx: Some(asset_tx),
                            rune_tx: Some(rune_tx),
                        })
                    }
                    Err(e) => {
                        error!(
                            "RUNE leg of {} add failed after asset leg {}: {}",
                            pool_asset, asset_tx, e
                        );
                        Err(MultiChainError::SecondLegFailed {
                            completed: AddLiquidityTxns {
                                asset_tx: Some(asset_tx),
                                rune_tx: None,
                            },
                            source: Box::new(e),
                        })
                    }
                }
            }
            LiquidityPlan::AssetOnly(asset_amount) => {
                let pool = self.resolver.resolve(chain).await?;
                let intent =
                    TransferIntent::new(asset_amount, pool.address, Memo::deposit(pool_asset, None))
                        .with_router(pool.router);
                let asset_tx = self.dispatcher().dispatch(&intent, true).await?;

                Ok(AddLiquidityTxns {
                    asset_tx: Some(asset_tx),
                    rune_tx: None,
                })
            }
            LiquidityPlan::RuneOnly(rune_amount) => {
                let intent = TransferIntent::new(
                    rune_amount,
                    THORCHAIN_POOL_ADDRESS,
                    Memo::deposit(pool_asset, None),
                );
                let rune_tx = self.dispatcher().dispatch(&intent, true).await?;

                Ok(AddLiquidityTxns {
                    asset_tx: None,
                    rune_tx: Some(rune_tx),
                })
            }
        }
    }

    /// Request a withdraw. The transferred value is the chain's minimum
    /// amount; the share comes from the memo.
    pub async fn withdraw(&self, params: &WithdrawParams) -> MultiChainResult<TxHash> {
        let plan = params.plan();
        let memo = Memo::withdraw(&params.pool_asset, params.percent, plan.target.as_ref())?;

        let pool = self.resolver.resolve(plan.origin_chain).await?;
        info!(
            "Withdrawing {} of {} via {}",
            params.percent, params.pool_asset, plan.origin_chain
        );

        let intent = TransferIntent::new(
            AssetAmount::min_amount_by_chain(plan.origin_chain),
            pool.address,
            memo,
        )
        .with_router(pool.router);
        self.dispatcher().dispatch(&intent, true).await
    }

    /// Upgrade legacy BNB or ETH hosted RUNE to native RUNE
    pub async fn upgrade(&self, params: &UpgradeParams) -> MultiChainResult<TxHash> {
        let chain = params.rune_amount.asset.chain();
        if !chain.hosts_legacy_rune() {
            return Err(MultiChainError::Unsupported(format!(
                "upgrade from {}",
                chain
            )));
        }

        let thor_address = self
            .session
            .address_for(Chain::Thor)
            .await
            .ok_or(MultiChainError::AddressNotFound { chain: Chain::Thor })?;
        let memo = Memo::upgrade(&thor_address)?;

        let pool = self.resolver.resolve(chain).await?;
        // BNB is a plain transfer; ETH without a router fails in the dispatcher
        let router = if chain.is_contract_chain() { pool.router } else { None };

        info!("Upgrading {} to {}", params.rune_amount, thor_address);
        let intent = TransferIntent::new(params.rune_amount.clone(), pool.address, memo)
            .with_router(router);
        self.dispatcher().dispatch(&intent, true).await
    }

    /// Whether the Ethereum router may spend `asset`. Assets without an
    /// approval concept are always approved.
    pub async fn is_asset_approved(&self, asset: &Asset) -> MultiChainResult<bool> {
        if !asset.requires_approval() {
            return Ok(true);
        }

        let pool = self.resolver.resolve(asset.chain()).await?;
        match (pool.router, asset.token_address()) {
            (Some(router), Some(token)) => {
                self.session
                    .adapters()
                    .ethereum()
                    .is_approved(&router, &token)
                    .await
            }
            _ => Ok(false),
        }
    }

    /// Approve the Ethereum router to spend `asset`. `None` when no approval
    /// applies.
    pub async fn approve_asset(&self, asset: &Asset) -> MultiChainResult<Option<TxHash>> {
        if !asset.requires_approval() {
            return Ok(None);
        }

        let pool = self.resolver.resolve(asset.chain()).await?;
        match (pool.router, asset.token_address()) {
            (Some(router), Some(token)) => self
                .session
                .adapters()
                .ethereum()
                .approve(&router, &token)
                .await
                .map(Some),
            _ => Ok(None),
        }
    }
}
