//! Telemetry configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Component tag, e.g. `fb-04`.
    pub component: Option<String>,

    /// Log level filter (trace, debug, info, warn, error) or an `EnvFilter`
    /// directive.
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "force-bridge".to_string(),
            component: None,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: force-bridge)
    /// - `FB_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `FB_JSON_LOGS`: JSON output (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "force-bridge".to_string()),

            component: None,

            log_level: env::var("FB_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("FB_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Environment configuration tagged with a component.
    pub fn for_component(component: &str) -> Self {
        Self {
            component: Some(component.to_string()),
            ..Self::from_env()
        }
    }

    /// Quiet configuration for test runs.
    pub fn for_testing() -> Self {
        Self {
            service_name: "force-bridge-tests".to_string(),
            log_level: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Service name including the component tag.
    pub fn full_service_name(&self) -> String {
        match &self.component {
            Some(component) => format!("{}-{}", self.service_name, component),
            None => self.service_name.clone(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
