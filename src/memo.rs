//! THORChain memo construction
//!
//! Memos are one-way: this module only ever builds them.
//!
//! | operation | format                                   |
//! |-----------|------------------------------------------|
//! | swap      | `=:CHAIN.SYMBOL:address:limit`           |
//! | deposit   | `+:CHAIN.SYMBOL[:paired address]`        |
//! | withdraw  | `-:CHAIN.SYMBOL:bps[:CHAIN.TICKER]`      |
//! | upgrade   | `SWITCH:address`                         |

use crate::entities::{Amount, Asset, Percent, THOR_DECIMALS};
use crate::error::{MultiChainError, MultiChainResult};

pub struct Memo;

impl Memo {
    /// Swap into `asset`, paying out to `address`. `limit` is the minimum
    /// output; the protocol refunds when it cannot be met.
    pub fn swap(asset: &Asset, address: &str, limit: Option<&Amount>) -> MultiChainResult<String> {
        let limit = match limit {
            Some(amount) => amount.to_decimals(THOR_DECIMALS)?.base_amount().to_string(),
            None => String::new(),
        };

        Ok(format!("=:{}.{}:{}:{}", asset.chain(), asset.symbol(), address, limit))
    }

    /// Add liquidity to `asset`'s pool. `paired_address` links the two legs
    /// of a symmetric add.
    pub fn deposit(asset: &Asset, paired_address: Option<&str>) -> String {
        match paired_address.filter(|address| !address.is_empty()) {
            Some(address) => format!("+:{}.{}:{}", asset.chain(), asset.symbol(), address),
            None => format!("+:{}.{}", asset.chain(), asset.symbol()),
        }
    }

    /// Withdraw `percent` of the position in `asset`'s pool, optionally
    /// paid out entirely as `target`.
    pub fn withdraw(
        asset: &Asset,
        percent: Percent,
        target: Option<&Asset>,
    ) -> MultiChainResult<String> {
        if !percent.is_valid_share() {
            return Err(MultiChainError::InvalidPercent {
                basis_points: percent.basis_points(),
            });
        }

        let memo = format!(
            "-:{}.{}:{}",
            asset.chain(),
            asset.symbol(),
            percent.basis_points()
        );

        Ok(match target {
            Some(target) => format!("{}:{}.{}", memo, target.chain(), target.ticker()),
            None => memo,
        })
    }

    /// Switch legacy RUNE to native RUNE at `address`
    pub fn upgrade(address: &str) -> MultiChainResult<String> {
        if address.is_empty() {
            return Err(MultiChainError::InvalidMemo(
                "upgrade requires a destination address".to_string(),
            ));
        }
        Ok(format!("SWITCH:{}", address))
    }
}
