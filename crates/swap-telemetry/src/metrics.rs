//! Prometheus metrics for the escrow engine.
//!
//! All metrics follow the naming convention: `xs_<subsystem>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ESCROW METRICS (xs-02)
    // =========================================================================

    /// Escrows created, by side
    pub static ref ESCROWS_CREATED: CounterVec = CounterVec::new(
        Opts::new("xs_escrow_created_total", "Escrow records created"),
        &["side"]  // side: src/dst
    ).expect("metric creation failed");

    /// Escrows whose funds were moved into custody
    pub static ref ESCROWS_LOCKED: Counter = Counter::new(
        "xs_escrow_locked_total",
        "Escrow records that reached the locked state"
    ).expect("metric creation failed");

    /// Claims, by path
    pub static ref ESCROWS_CLAIMED: CounterVec = CounterVec::new(
        Opts::new("xs_escrow_claimed_total", "Escrow claims"),
        &["path"]  // path: private/public
    ).expect("metric creation failed");

    /// Cancellations, by path
    pub static ref ESCROWS_CANCELLED: CounterVec = CounterVec::new(
        Opts::new("xs_escrow_cancelled_total", "Escrow cancellations"),
        &["path"]  // path: private/public
    ).expect("metric creation failed");

    // =========================================================================
    // REGISTRY METRICS (xs-01)
    // =========================================================================

    /// Registry mutations, by action
    pub static ref REGISTRY_CHANGES: CounterVec = CounterVec::new(
        Opts::new("xs_registry_changes_total", "Chain registry mutations"),
        &["action"]  // action: register/update/remove
    ).expect("metric creation failed");

    // =========================================================================
    // ORDER METRICS (xs-03)
    // =========================================================================

    /// Order lifecycle events
    pub static ref ORDERS: CounterVec = CounterVec::new(
        Opts::new("xs_orders_total", "Order lifecycle events"),
        &["event"]  // event: created/matched/committed/cancelled
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Fails if called twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ESCROWS_CREATED.clone()),
        Box::new(ESCROWS_LOCKED.clone()),
        Box::new(ESCROWS_CLAIMED.clone()),
        Box::new(ESCROWS_CANCELLED.clone()),
        Box::new(REGISTRY_CHANGES.clone()),
        Box::new(ORDERS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
