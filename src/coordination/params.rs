//! Inputs and results of the liquidity and upgrade operations

use crate::chain::TxHash;
use crate::entities::{Asset, AssetAmount, Chain, Percent};
use crate::error::{MultiChainError, MultiChainResult};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityParams {
    pub pool_asset: Asset,
    pub rune_amount: Option<AssetAmount>,
    pub asset_amount: Option<AssetAmount>,
}

/// Hashes of the legs that were submitted. A leg that was not attempted,
/// or failed, stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddLiquidityTxns {
    pub asset_tx: Option<TxHash>,
    pub rune_tx: Option<TxHash>,
}

/// Shape of a liquidity add, chosen by which sides are positive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidityPlan {
    Symmetric {
        asset_amount: AssetAmount,
        rune_amount: AssetAmount,
    },
    AssetOnly(AssetAmount),
    RuneOnly(AssetAmount),
}

impl AddLiquidityParams {
    pub fn plan(&self) -> MultiChainResult<LiquidityPlan> {
        let positive = |amount: &Option<AssetAmount>| amount.clone().filter(|a| a.is_positive());

        match (positive(&self.asset_amount), positive(&self.rune_amount)) {
            (Some(asset_amount), Some(rune_amount)) => Ok(LiquidityPlan::Symmetric {
                asset_amount,
                rune_amount,
            }),
            (Some(asset_amount), None) => Ok(LiquidityPlan::AssetOnly(asset_amount)),
            (None, Some(rune_amount)) => Ok(LiquidityPlan::RuneOnly(rune_amount)),
            (None, None) => Err(MultiChainError::InvalidAmount(format!(
                "Add liquidity to {} needs a positive asset or rune amount",
                self.pool_asset
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawFrom {
    Sym,
    Rune,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawTo {
    Sym,
    Rune,
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawParams {
    pub pool_asset: Asset,
    pub percent: Percent,
    pub from: WithdrawFrom,
    pub to: WithdrawTo,
}

/// Where a withdraw request is sent and which asset its memo targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawPlan {
    pub origin_chain: Chain,
    pub target: Option<Asset>,
}

impl WithdrawParams {
    pub fn plan(&self) -> WithdrawPlan {
        match (self.from, self.to) {
            (WithdrawFrom::Sym, WithdrawTo::Sym) | (WithdrawFrom::Rune, _) => WithdrawPlan {
                origin_chain: Chain::Thor,
                target: None,
            },
            // the asset-side position can only be withdrawn from its own chain
            (WithdrawFrom::Asset, _) => WithdrawPlan {
                origin_chain: self.pool_asset.chain(),
                target: None,
            },
            (WithdrawFrom::Sym, WithdrawTo::Rune) => WithdrawPlan {
                origin_chain: Chain::Thor,
                target: Some(Asset::rune()),
            },
            (WithdrawFrom::Sym, WithdrawTo::Asset) => WithdrawPlan {
                origin_chain: Chain::Thor,
                target: Some(self.pool_asset.clone()),
            },
        }
    }
}

/// Migrate legacy RUNE (BNB or ETH hosted) to native RUNE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeParams {
    pub rune_amount: AssetAmount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    fn btc_pool() -> Asset {
        Asset::native(Chain::Btc)
    }

    fn params(asset: Option<u64>, rune: Option<u64>) -> AddLiquidityParams {
        AddLiquidityParams {
            pool_asset: btc_pool(),
            asset_amount: asset.map(|a| AssetAmount::from_base(btc_pool(), U256::from(a))),
            rune_amount: rune.map(|r| AssetAmount::from_base(Asset::rune(), U256::from(r))),
        }
    }

    #[test]
    fn test_liquidity_plan() {
        assert!(matches!(params(Some(1), Some(1)).plan(), Ok(LiquidityPlan::Symmetric { .. })));
        assert!(matches!(params(Some(1), None).plan(), Ok(LiquidityPlan::AssetOnly(_))));
        assert!(matches!(params(Some(1), Some(0)).plan(), Ok(LiquidityPlan::AssetOnly(_))));
        assert!(matches!(params(Some(0), Some(3)).plan(), Ok(LiquidityPlan::RuneOnly(_))));

        let err = params(Some(0), None).plan().unwrap_err();
        assert!(matches!(err, MultiChainError::InvalidAmount(_)));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_withdraw_plan() {
        let plan = |from, to| {
            WithdrawParams {
                pool_asset: btc_pool(),
                percent: Percent::from_percent(50),
                from,
                to,
            }
            .plan()
        };

        assert_eq!(plan(WithdrawFrom::Sym, WithdrawTo::Sym).target, None);
        assert_eq!(plan(WithdrawFrom::Rune, WithdrawTo::Asset).origin_chain, Chain::Thor);
        assert_eq!(plan(WithdrawFrom::Rune, WithdrawTo::Asset).target, None);

        let from_asset = plan(WithdrawFrom::Asset, WithdrawTo::Asset);
        assert_eq!(from_asset.origin_chain, Chain::Btc);
        assert_eq!(from_asset.target, None);

        assert_eq!(plan(WithdrawFrom::Sym, WithdrawTo::Rune).target, Some(Asset::rune()));
        assert_eq!(plan(WithdrawFrom::Sym, WithdrawTo::Asset).target, Some(btc_pool()));
    }
}
