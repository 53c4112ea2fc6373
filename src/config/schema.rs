//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//! Upstream credentials are deliberately absent: they come from a
//! [`CredentialSource`](crate::insights::CredentialSource) instead.

use serde::{Deserialize, Serialize};

/// Endpoint of the account insights API.
pub const DEFAULT_INSIGHTS_ENDPOINT: &str = "https://api.abnamro.com/v2/account-insights";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Route mounting.
    pub http: HttpConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Outbound insights call.
    pub insights: InsightsConfig,

    /// Audio upload storage.
    pub upload: UploadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:7071").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:7071".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Route mounting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Prefix every handler route is nested under. The pages link to
    /// sibling routes through it.
    pub route_prefix: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/api".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout applied by the server, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 230 }
    }
}

/// Outbound insights API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// HTTPS endpoint queried with mutual TLS.
    pub endpoint: String,

    /// Optional timeout for the upstream call. `None` leaves the call
    /// bounded only by the request timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INSIGHTS_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

/// Audio upload storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded recordings are written to.
    pub directory: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: "./uploads".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 25 * 1024 * 1024, // 25MB, enough for a few minutes of webm
        }
    }
}
