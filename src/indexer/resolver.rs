//! Pool (inbound) address resolution

use super::Indexer;
use crate::entities::Chain;
use crate::error::MultiChainResult;

use std::sync::Arc;
use tracing::{debug, warn};

/// THORChain has no inbound vault; native deposits go to this sentinel
pub const THORCHAIN_POOL_ADDRESS: &str = "";

/// Where funds for a protocol action on `chain` must be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAddressData {
    pub chain: Chain,
    pub address: String,
    /// Copied verbatim from the indexer. Callers check this before
    /// submitting funds.
    pub halted: bool,
    pub router: Option<String>,
}

impl PoolAddressData {
    pub fn native() -> Self {
        Self {
            chain: Chain::Thor,
            address: THORCHAIN_POOL_ADDRESS.to_string(),
            halted: false,
            router: None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.chain == Chain::Thor
    }
}

/// Looks up inbound addresses per operation. Nothing is cached.
#[derive(Clone)]
pub struct PoolAddressResolver {
    indexer: Arc<dyn Indexer>,
}

impl PoolAddressResolver {
    pub fn new(indexer: Arc<dyn Indexer>) -> Self {
        Self { indexer }
    }

    pub async fn resolve(&self, chain: Chain) -> MultiChainResult<PoolAddressData> {
        if chain == Chain::Thor {
            return Ok(PoolAddressData::native());
        }

        let inbound = self.indexer.inbound_address(chain).await?;
        if inbound.halted {
            warn!("Inbound address for {} is halted", chain);
        }
        debug!("Resolved {} pool address {}", chain, inbound.address);

        Ok(PoolAddressData {
            chain,
            address: inbound.address,
            halted: inbound.halted,
            router: inbound.router.filter(|r| !r.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MultiChainError;
    use crate::indexer::{InboundAddress, MockIndexer};

    fn inbound(chain: &str, router: Option<&str>, halted: bool) -> InboundAddress {
        InboundAddress {
            chain: chain.to_string(),
            pub_key: String::new(),
            address: format!("{}-vault", chain.to_lowercase()),
            halted,
            router: router.map(str::to_string),
            gas_rate: None,
        }
    }

    #[tokio::test]
    async fn test_native_chain_never_queries_indexer() {
        let mut indexer = MockIndexer::new();
        indexer.expect_inbound_address().never();
        indexer.expect_inbound_addresses().never();

        let resolver = PoolAddressResolver::new(Arc::new(indexer));
        let data = tokio_test::assert_ok!(resolver.resolve(Chain::Thor).await);

        assert_eq!(data, PoolAddressData::native());
        assert_eq!(data.address, THORCHAIN_POOL_ADDRESS);
        assert!(!data.halted);
    }

    #[tokio::test]
    async fn test_external_chain_issues_one_query() {
        for chain in Chain::ALL.into_iter().filter(|c| *c != Chain::Thor) {
            let mut indexer = MockIndexer::new();
            indexer
                .expect_inbound_address()
                .withf(move |c| *c == chain)
                .times(1)
                .returning(|c| Ok(inbound(c.ticker(), None, false)));

            let resolver = PoolAddressResolver::new(Arc::new(indexer));
            let data = resolver.resolve(chain).await.unwrap();
            assert_eq!(data.chain, chain);
        }
    }

    #[tokio::test]
    async fn test_halted_flag_and_router_pass_through() {
        let mut indexer = MockIndexer::new();
        indexer
            .expect_inbound_address()
            .times(1)
            .returning(|_| Ok(inbound("ETH", Some("0xrouter"), true)));

        let data = PoolAddressResolver::new(Arc::new(indexer))
            .resolve(Chain::Eth)
            .await
            .unwrap();
        assert!(data.halted);
        assert_eq!(data.router.as_deref(), Some("0xrouter"));
        assert_eq!(data.address, "eth-vault");
    }

    #[tokio::test]
    async fn test_indexer_error_is_propagated_unchanged() {
        let mut indexer = MockIndexer::new();
        indexer
            .expect_inbound_address()
            .times(1)
            .returning(|_| Err(MultiChainError::Indexer("503 Service Unavailable".into())));

        let err = tokio_test::assert_err!(
            PoolAddressResolver::new(Arc::new(indexer))
                .resolve(Chain::Btc)
                .await
        );
        assert!(matches!(err, MultiChainError::Indexer(ref m) if m == "503 Service Unavailable"));
    }
}
