//! Operation orchestration for swaps, liquidity, withdraws and upgrades
//!
//! The orchestrator:
//! 1. Validates preconditions without touching the network
//! 2. Resolves the inbound address (and router) for the origin chain
//! 3. Builds the protocol memo
//! 4. Hands the transfer to the dispatcher, sequencing multi-leg adds

pub mod orchestrator;
pub mod params;

pub use orchestrator::Orchestrator;
pub use params::{
    AddLiquidityParams, AddLiquidityTxns, LiquidityPlan, UpgradeParams, WithdrawFrom,
    WithdrawParams, WithdrawPlan, WithdrawTo,
};
