//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Panic recovery policy.
    pub recovery: RecoveryConfig,

    /// Service description/documentation links advertised on every response.
    pub service_links: ServiceLinksConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address: `ip:port` (e.g., "0.0.0.0:8080") or `host:port`
    /// (e.g., "localhost:8080"), resolved when the listener binds.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Recovery middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Include the panic message as `detail` in the client-facing problem.
    /// The message is always logged.
    pub expose_detail: bool,

    /// Log (a prefix of) the request body when a handler panics.
    pub log_body: bool,

    /// Maximum number of request body bytes kept for logging.
    pub max_logged_body_bytes: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            expose_detail: false,
            log_body: true,
            max_logged_body_bytes: 4096,
        }
    }
}

/// Canonical service links.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceLinksConfig {
    /// Target of the `service-desc` relation (machine-readable description).
    pub description: String,

    /// Target of the `service-doc` relation (human-readable documentation).
    pub documentation: String,
}

impl Default for ServiceLinksConfig {
    fn default() -> Self {
        Self {
            description: "/openapi.json".to_string(),
            documentation: "/docs".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
