//! THORChain multi-chain inspector
//!
//! Prints the inbound address of every configured chain, whether it is
//! halted, and the state of the liquidity funds cap.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use thorswap_multichain::config::Settings;
use thorswap_multichain::indexer::{Indexer, LiquidityCap, MidgardClient, PoolAddressResolver};
use thorswap_multichain::metrics;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("Starting THORChain multi-chain inspector v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "Loaded configuration for {} chains on {}",
        settings.wallet.chains.len(),
        settings.wallet.network
    );

    let indexer: Arc<dyn Indexer> = Arc::new(MidgardClient::from_config(&settings.indexer)?);
    let resolver = PoolAddressResolver::new(indexer.clone());

    println!("{:<6} {:<8} {:<50} ROUTER", "CHAIN", "STATUS", "INBOUND ADDRESS");
    for chain in &settings.wallet.chains {
        match resolver.resolve(*chain).await {
            Ok(pool) => {
                let status = if pool.halted { "halted" } else { "active" };
                let address = if pool.is_native() { "(native deposit)" } else { pool.address.as_str() };
                println!(
                    "{:<6} {:<8} {:<50} {}",
                    chain,
                    status,
                    address,
                    pool.router.as_deref().unwrap_or("-")
                );
            }
            Err(e) => {
                error!("Failed to resolve {} inbound address: {}", chain, e);
                metrics::record_operation_failure("resolve");
            }
        }
    }

    match tokio::try_join!(indexer.network(), indexer.mimir()) {
        Ok((network, mimir)) => {
            let cap = LiquidityCap::from_parts(&network, &mimir)?;
            match cap.max_liquidity_rune {
                Some(max) => println!(
                    "\nPooled RUNE {} of max {} (funds cap reached: {})",
                    cap.total_pooled_rune,
                    max,
                    cap.is_funds_cap_reached()
                ),
                None => println!("\nNo liquidity cap set"),
            }
        }
        Err(e) => warn!("Funds cap unavailable: {}", e),
    }

    if std::env::var("MULTICHAIN_PRINT_METRICS").is_ok() {
        println!("\n{}", metrics::gather());
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,thorswap_multichain=debug,hyper=warn,reqwest=warn")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}
