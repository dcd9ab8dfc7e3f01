//! Domain entities: chains, assets, amounts and swap estimates

pub mod amount;
pub mod asset;
pub mod chain;
pub mod swap;

pub use amount::{Amount, AssetAmount, Percent, THOR_DECIMALS};
pub use asset::Asset;
pub use chain::{Chain, Network};
pub use swap::{Pool, Swap};
