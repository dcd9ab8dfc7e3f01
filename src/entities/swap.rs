//! Pool snapshots and swap estimation
//!
//! Continuous-liquidity pool math, all in THORChain's 1e8 scale:
//!
//! - output `y = x·X·Y / (x + X)²`
//! - liquidity fee `f = x²·Y / (x + X)²`
//! - slip `s = x / (x + X)`
//!
//! where `x` is the input, `X` the input-side depth and `Y` the output-side
//! depth. Asset-to-asset swaps route through RUNE and chain two pools.

use super::amount::{Amount, AssetAmount, Percent, THOR_DECIMALS};
use super::Asset;
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::U256;

const MAX_BASIS_POINTS: u32 = 10_000;

/// Depth snapshot of a single RUNE/asset pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub asset: Asset,
    /// Asset side depth in 1e8 units
    pub asset_depth: U256,
    /// RUNE side depth in 1e8 units
    pub rune_depth: U256,
}

impl Pool {
    pub fn new(asset: Asset, asset_depth: U256, rune_depth: U256) -> Self {
        Self {
            asset,
            asset_depth,
            rune_depth,
        }
    }

    fn is_empty(&self) -> bool {
        self.asset_depth.is_zero() || self.rune_depth.is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SwapLeg {
    output: U256,
    fee: U256,
    slip_bps: u32,
}

fn single_swap(input: U256, input_depth: U256, output_depth: U256) -> SwapLeg {
    let denominator = (input + input_depth) * (input + input_depth);
    if denominator.is_zero() {
        return SwapLeg {
            output: U256::ZERO,
            fee: U256::ZERO,
            slip_bps: 0,
        };
    }

    let output = input * input_depth * output_depth / denominator;
    let fee = input * input * output_depth / denominator;
    let slip = input * U256::from(MAX_BASIS_POINTS) / (input + input_depth);

    SwapLeg {
        output,
        fee,
        slip_bps: slip.saturating_to::<u32>(),
    }
}

/// Estimated swap between two assets. Immutable; build a new one when any
/// input changes.
#[derive(Debug, Clone)]
pub struct Swap {
    input_amount: AssetAmount,
    output_asset: Asset,
    slip_limit: Percent,
    output_amount: AssetAmount,
    fee: AssetAmount,
    slip: Percent,
    min_output_amount: Amount,
    has_insufficient_fee: bool,
}

impl Swap {
    /// Estimate swapping `input_amount` into `output_asset`.
    ///
    /// `outbound_fee` is the network fee the output chain charges, in
    /// output-asset units; an estimate that does not exceed it is flagged
    /// as insufficient.
    pub fn new(
        input_amount: AssetAmount,
        output_asset: Asset,
        pools: &[Pool],
        slip_limit: Percent,
        outbound_fee: Amount,
    ) -> MultiChainResult<Self> {
        let input_asset = input_amount.asset.clone();
        if input_asset == output_asset {
            return Err(MultiChainError::InvalidAsset(format!(
                "cannot swap {} into itself",
                input_asset
            )));
        }

        let x = input_amount.amount.to_decimals(THOR_DECIMALS)?.base_amount();
        let rune = Asset::rune();

        let leg = if input_asset == rune {
            let pool = find_pool(pools, &output_asset)?;
            single_swap(x, pool.rune_depth, pool.asset_depth)
        } else if output_asset == rune {
            let pool = find_pool(pools, &input_asset)?;
            single_swap(x, pool.asset_depth, pool.rune_depth)
        } else {
            let first = find_pool(pools, &input_asset)?;
            let second = find_pool(pools, &output_asset)?;

            let to_rune = single_swap(x, first.asset_depth, first.rune_depth);
            let to_asset = single_swap(to_rune.output, second.rune_depth, second.asset_depth);

            // first-leg fee is paid in RUNE, price it in the output asset
            let first_fee = to_rune.fee * second.asset_depth / second.rune_depth;

            SwapLeg {
                output: to_asset.output,
                fee: to_asset.fee + first_fee,
                slip_bps: to_rune.slip_bps.saturating_add(to_asset.slip_bps),
            }
        };

        let output = Amount::from_base(leg.output, THOR_DECIMALS);
        let min_output_amount =
            output.mul_basis_points(MAX_BASIS_POINTS.saturating_sub(slip_limit.basis_points()));
        let has_insufficient_fee = output <= outbound_fee;

        Ok(Self {
            output_amount: AssetAmount::new(output_asset.clone(), output),
            fee: AssetAmount::new(output_asset.clone(), Amount::from_base(leg.fee, THOR_DECIMALS)),
            slip: Percent::from_basis_points(leg.slip_bps),
            input_amount,
            output_asset,
            slip_limit,
            min_output_amount,
            has_insufficient_fee,
        })
    }

    pub fn input_asset(&self) -> &Asset {
        &self.input_amount.asset
    }

    pub fn output_asset(&self) -> &Asset {
        &self.output_asset
    }

    pub fn input_amount(&self) -> &AssetAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &AssetAmount {
        &self.output_amount
    }

    /// Liquidity fee, in the output asset
    pub fn fee(&self) -> &AssetAmount {
        &self.fee
    }

    pub fn slip(&self) -> Percent {
        self.slip
    }

    pub fn slip_limit(&self) -> Percent {
        self.slip_limit
    }

    /// Lowest output accepted on chain before the swap is refunded
    pub fn min_output_amount(&self) -> &Amount {
        &self.min_output_amount
    }

    pub fn has_insufficient_fee(&self) -> bool {
        self.has_insufficient_fee
    }
}

fn find_pool<'a>(pools: &'a [Pool], asset: &Asset) -> MultiChainResult<&'a Pool> {
    pools
        .iter()
        .find(|pool| &pool.asset == asset && !pool.is_empty())
        .ok_or_else(|| MultiChainError::PoolNotFound(asset.to_string()))
}
