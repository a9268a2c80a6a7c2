//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log records
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "cross-swap".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XS_SERVICE_NAME`: Service name (default: cross-swap)
    /// - `XS_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `XS_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `XS_JSON_LOGS`: Enable JSON logs (default: false outside containers)
    /// - `XS_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("XS_SERVICE_NAME").unwrap_or_else(|_| "cross-swap".to_string()),

            log_level: env::var("XS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("XS_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("XS_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: env::var("XS_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
        }
    }

    /// Configuration used by test harnesses: debug level, console only.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }
}
