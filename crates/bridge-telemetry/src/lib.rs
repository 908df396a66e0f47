//! # Bridge Telemetry
//!
//! Structured logging for the Force Bridge verification core.
//!
//! Every component logs through `tracing` with a `[fb-NN]` message prefix
//! and structured fields. This crate installs the subscriber.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config).expect("logging");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `force-bridge` | Service name |
//! | `FB_LOG_LEVEL` / `RUST_LOG` | `info` | Level filter |
//! | `FB_JSON_LOGS` | `false` | JSON lines output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already set, or installing it failed.
    #[error("Failed to initialize subscriber: {0}")]
    SubscriberInit(String),

    /// Invalid filter or configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
