//! Fixed-precision amounts
//!
//! An [`Amount`] is an integer count of base units plus the scale those
//! units are expressed in. Nothing here touches floating point.

use super::{Asset, Chain};
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::U256;
use std::cmp::Ordering;
use std::fmt;

/// Scale THORChain uses for pool depths and memo limits
pub const THOR_DECIMALS: u8 = 8;

const BASIS_POINTS: u32 = 10_000;

pub(crate) fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

#[derive(Debug, Clone, Copy)]
pub struct Amount {
    base: U256,
    decimals: u8,
}

impl Amount {
    pub fn from_base(base: U256, decimals: u8) -> Self {
        Self {
            base,
            decimals,
        }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::from_base(U256::ZERO, decimals)
    }

    /// Parse a human decimal string such as `"1.25"`
    pub fn from_decimal_str(value: &str, decimals: u8) -> MultiChainResult<Self> {
        let invalid = || MultiChainError::InvalidAmount(value.to_string());

        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > decimals as usize {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!(
            "{}{:0<width$}",
            if whole.is_empty() { "0" } else { whole },
            fraction,
            width = decimals as usize
        );
        let base = digits.parse::<U256>().map_err(|_| invalid())?;

        Ok(Self { base, decimals })
    }

    pub fn base_amount(&self) -> U256 {
        self.base
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.base.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero()
    }

    /// Rescale to `decimals`, truncating when the scale shrinks. Fails when
    /// the upscaled value does not fit in 256 bits.
    pub fn to_decimals(&self, decimals: u8) -> MultiChainResult<Amount> {
        let base = match decimals.cmp(&self.decimals) {
            Ordering::Equal => self.base,
            Ordering::Greater => self
                .base
                .checked_mul(pow10(decimals - self.decimals))
                .ok_or_else(|| {
                    MultiChainError::InvalidAmount(format!(
                        "{} overflows at {} decimals",
                        self, decimals
                    ))
                })?,
            Ordering::Less => self.base / pow10(self.decimals - decimals),
        };
        Ok(Amount { base, decimals })
    }

    /// Multiply by `basis_points / 10000`
    pub fn mul_basis_points(&self, basis_points: u32) -> Amount {
        Amount {
            base: self.base.saturating_mul(U256::from(basis_points)) / U256::from(BASIS_POINTS),
            decimals: self.decimals,
        }
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.decimals.cmp(&other.decimals) {
            Ordering::Equal => self.base.cmp(&other.base),
            // an upscale that overflows is larger than any U256
            Ordering::Less => match self.base.checked_mul(pow10(other.decimals - self.decimals)) {
                Some(scaled) => scaled.cmp(&other.base),
                None => Ordering::Greater,
            },
            Ordering::Greater => other.cmp(self).reverse(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.base);
        }

        let unit = pow10(self.decimals);
        let whole = self.base / unit;
        let fraction = format!(
            "{:0>width$}",
            (self.base % unit).to_string(),
            width = self.decimals as usize
        );
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{}", whole, fraction)
        }
    }
}

/// An amount of a specific asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAmount {
    pub asset: Asset,
    pub amount: Amount,
}

impl AssetAmount {
    pub fn new(asset: Asset, amount: Amount) -> Self {
        Self { asset, amount }
    }

    /// Amount given in the asset's own base units
    pub fn from_base(asset: Asset, base: U256) -> Self {
        let decimals = asset.decimals();
        Self {
            asset,
            amount: Amount::from_base(base, decimals),
        }
    }

    /// Amount expressed in the asset's own scale
    pub fn in_asset_decimals(&self) -> MultiChainResult<Amount> {
        self.amount.to_decimals(self.asset.decimals())
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    /// Smallest non-zero transfer accepted on `chain`.
    ///
    /// Used as the carrier amount for withdraw requests whose real size is
    /// encoded in the memo.
    pub fn min_amount_by_chain(chain: Chain) -> Self {
        let asset = Asset::native(chain);
        match chain {
            // UTXO dust threshold
            Chain::Btc | Chain::Ltc | Chain::Bch => Self::from_base(asset, U256::from(10_001u64)),
            Chain::Thor | Chain::Bnb | Chain::Eth => Self::from_base(asset, U256::from(1u64)),
        }
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.asset)
    }
}

/// Percentage held in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(u32);

impl Percent {
    pub fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub fn from_percent(percent: u32) -> Self {
        Self(percent.saturating_mul(100))
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    /// Within (0, 100]
    pub fn is_valid_share(&self) -> bool {
        self.0 > 0 && self.0 <= BASIS_POINTS
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;
        if fraction == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:02}%", whole, fraction)
        }
    }
}
