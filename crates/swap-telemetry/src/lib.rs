//! # Swap Telemetry
//!
//! Logging and metrics for the escrow engine.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with env filter, pretty or JSON output
//! - **Metrics**: Prometheus counters for escrow, registry and order activity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swap_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `XS_JSON_LOGS` | `false` | JSON formatted logs |
//! | `XS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `XS_NETWORK` | `testnet` | Network label |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};
pub use metrics::{
    encode_metrics, register_metrics, ESCROWS_CANCELLED, ESCROWS_CLAIMED, ESCROWS_CREATED,
    ESCROWS_LOCKED, ORDERS, REGISTRY_CHANGES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
