//! Ethereum adapter: router deposits and ERC-20 approvals
//!
//! Deposits on Ethereum are not plain transfers. Funds go through the
//! THORChain router contract, which needs an ERC-20 allowance for tokens.

use super::adapter::ChainAdapter;
use super::client::{ContractCall, Signer, TxHash};
use crate::entities::{AssetAmount, Chain};
use crate::error::{MultiChainError, MultiChainResult};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use std::str::FromStr;
use tracing::{debug, info};

sol! {
    interface IRouter {
        function deposit(address vault, address asset, uint256 amount, string memo) external payable;
    }

    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

fn parse_address(address: &str) -> MultiChainResult<Address> {
    Address::from_str(address).map_err(|_| MultiChainError::InvalidAddress {
        chain: Chain::Eth,
        address: address.to_string(),
    })
}

/// Calldata for `router.deposit(vault, asset, amount, memo)`
pub fn encode_router_deposit(
    vault: &str,
    asset: Address,
    amount: U256,
    memo: &str,
) -> MultiChainResult<Bytes> {
    let call = IRouter::depositCall {
        vault: parse_address(vault)?,
        asset,
        amount,
        memo: memo.to_string(),
    };
    Ok(call.abi_encode().into())
}

/// Calldata for `token.allowance(owner, spender)`
pub fn encode_allowance(owner: &str, spender: &str) -> MultiChainResult<Bytes> {
    let call = IERC20::allowanceCall {
        owner: parse_address(owner)?,
        spender: parse_address(spender)?,
    };
    Ok(call.abi_encode().into())
}

/// Calldata for an unlimited `token.approve(spender, 2^256 - 1)`
pub fn encode_approve(spender: &str) -> MultiChainResult<Bytes> {
    let call = IERC20::approveCall {
        spender: parse_address(spender)?,
        amount: U256::MAX,
    };
    Ok(call.abi_encode().into())
}

fn decode_allowance(data: &[u8]) -> MultiChainResult<U256> {
    IERC20::allowanceCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| MultiChainError::Chain {
            chain: Chain::Eth,
            message: format!("Invalid allowance response: {}", e),
        })
}

#[derive(Debug)]
pub struct EthereumAdapter {
    inner: ChainAdapter,
}

impl EthereumAdapter {
    pub fn new(inner: ChainAdapter) -> Self {
        debug_assert_eq!(inner.chain(), Chain::Eth);
        Self { inner }
    }

    pub fn adapter(&self) -> &ChainAdapter {
        &self.inner
    }

    /// Deposit through the router into the vault at `vault`. Native ETH is
    /// sent as call value with the zero address as asset.
    pub async fn deposit(
        &self,
        asset_amount: &AssetAmount,
        vault: &str,
        memo: &str,
        router: &str,
    ) -> MultiChainResult<TxHash> {
        let request = self.inner.transfer_request(asset_amount, vault, Some(memo.to_string()))?;
        let asset = &request.asset_amount.asset;
        let amount = request.asset_amount.amount.base_amount();

        let (token, value) = if asset.is_native() {
            (Address::ZERO, amount)
        } else {
            let token = asset
                .token_address()
                .ok_or_else(|| MultiChainError::InvalidAsset(asset.to_string()))?;
            (parse_address(&token)?, U256::ZERO)
        };

        let call = ContractCall {
            to: router.to_string(),
            value,
            data: encode_router_deposit(vault, token, amount, memo)?,
        };

        let tx_hash = self.send_call(call).await?;
        info!("Router deposit submitted for {}: {}", asset, tx_hash);
        Ok(tx_hash)
    }

    /// Whether `spender` holds a non-zero allowance on `token` for this wallet
    pub async fn is_approved(&self, spender: &str, token: &str) -> MultiChainResult<bool> {
        let owner = self.inner.require_address()?;
        let call = ContractCall {
            to: token.to_string(),
            value: U256::ZERO,
            data: encode_allowance(&owner, spender)?,
        };

        let response = self.inner.client().read_contract(call).await?;
        let allowance = decode_allowance(&response)?;

        debug!("Allowance of {} on {}: {}", spender, token, allowance);
        Ok(allowance > U256::ZERO)
    }

    /// Grant `spender` an unlimited allowance on `token`
    pub async fn approve(&self, spender: &str, token: &str) -> MultiChainResult<TxHash> {
        let call = ContractCall {
            to: token.to_string(),
            value: U256::ZERO,
            data: encode_approve(spender)?,
        };

        let tx_hash = self.send_call(call).await?;
        info!("Approval of {} on {} submitted: {}", spender, token, tx_hash);
        Ok(tx_hash)
    }

    async fn send_call(&self, call: ContractCall) -> MultiChainResult<TxHash> {
        debug!(
            "Contract call to {} with data 0x{}",
            call.to,
            hex::encode(&call.data)
        );

        match self.inner.signer() {
            Signer::None => Err(MultiChainError::NoSigner { chain: Chain::Eth }),
            Signer::LocalKey => self.inner.client().call_contract(call).await,
            Signer::Delegate { delegate, .. } => delegate.request_contract_call(call).await,
        }
    }
}
