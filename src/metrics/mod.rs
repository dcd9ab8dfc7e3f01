//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Transfers submitted per chain and dispatch path
//! - Failed orchestrator operations
//! - Per-chain wallet load failures
//! - Indexer request failures

use crate::entities::Chain;

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing::warn;

lazy_static! {
    // Transfer metrics
    pub static ref TRANSFERS_SUBMITTED: CounterVec = register_counter_vec!(
        "multichain_transfers_submitted_total",
        "Total transfers submitted by chain and dispatch path",
        &["chain", "kind"]
    ).unwrap();

    pub static ref TRANSFERS_FAILED: CounterVec = register_counter_vec!(
        "multichain_transfers_failed_total",
        "Total transfers rejected by chain and dispatch path",
        &["chain", "kind"]
    ).unwrap();

    // Operation metrics
    pub static ref OPERATION_FAILURES: CounterVec = register_counter_vec!(
        "multichain_operation_failures_total",
        "Total failed operations by operation name",
        &["operation"]
    ).unwrap();

    // Wallet metrics
    pub static ref WALLET_LOAD_FAILURES: CounterVec = register_counter_vec!(
        "multichain_wallet_load_failures_total",
        "Total per-chain wallet load failures",
        &["chain"]
    ).unwrap();

    // Indexer metrics
    pub static ref INDEXER_REQUEST_FAILURES: CounterVec = register_counter_vec!(
        "multichain_indexer_request_failures_total",
        "Total failed Midgard/THORNode requests by endpoint",
        &["endpoint"]
    ).unwrap();
}

/// Render every registered metric in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

// Helper functions to record metrics

pub fn record_transfer(chain: Chain, kind: &str) {
    TRANSFERS_SUBMITTED
        .with_label_values(&[chain.ticker(), kind])
        .inc();
}

pub fn record_transfer_failed(chain: Chain, kind: &str) {
    TRANSFERS_FAILED
        .with_label_values(&[chain.ticker(), kind])
        .inc();
}

pub fn record_operation_failure(operation: &str) {
    OPERATION_FAILURES
        .with_label_values(&[operation])
        .inc();
}

pub fn record_wallet_load_failure(chain: Chain) {
    WALLET_LOAD_FAILURES
        .with_label_values(&[chain.ticker()])
        .inc();
}

pub fn record_indexer_failure(endpoint: &str) {
    INDEXER_REQUEST_FAILURES
        .with_label_values(&[endpoint])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_show_up_in_text_output() {
        record_transfer(Chain::Btc, "transfer");
        record_wallet_load_failure(Chain::Ltc);

        let text = gather();
        assert!(text.contains("multichain_transfers_submitted_total"));
        assert!(text.contains("chain=\"LTC\""));
    }
}
