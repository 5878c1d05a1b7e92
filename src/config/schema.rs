//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the checker.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Health code served while no monitor has produced a usable verdict.
pub const FALLBACK_HEALTH_CODE: u16 = 200;

/// Root configuration for the network state checker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Serve the last aggregated snapshot instead of checking on demand.
    pub use_cached_results: bool,

    /// Status codes reported for each cluster verdict.
    #[serde(flatten)]
    pub codes: HealthCodes,

    /// Monitored targets. A monitor's position in this list is its identifier.
    pub servers: Vec<MonitorSpec>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            use_cached_results: true,
            codes: HealthCodes::default(),
            servers: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
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

/// HTTP status codes mapped from the cluster-wide verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCodes {
    pub code_healthy: u16,
    pub code_degraded: u16,
    pub code_failed: u16,
}

impl Default for HealthCodes {
    fn default() -> Self {
        Self {
            code_healthy: 200,
            code_degraded: 200,
            code_failed: 503,
        }
    }
}

/// Probe protocol of a monitor.
///
/// Anything other than `http`/`https` is kept as [`ProbeProtocol::Unsupported`]
/// so the worker can reject it at runtime without failing the whole config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ProbeProtocol {
    Http,
    Https,
    Unsupported(String),
}

impl From<String> for ProbeProtocol {
    fn from(value: String) -> Self {
        match value.as_str() {
            "http" => ProbeProtocol::Http,
            "https" => ProbeProtocol::Https,
            _ => ProbeProtocol::Unsupported(value),
        }
    }
}

impl From<ProbeProtocol> for String {
    fn from(protocol: ProbeProtocol) -> Self {
        match protocol {
            ProbeProtocol::Http => "http".to_string(),
            ProbeProtocol::Https => "https".to_string(),
            ProbeProtocol::Unsupported(other) => other,
        }
    }
}

/// A single monitored target.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonitorSpec {
    /// Target URL to probe.
    pub url: Option<String>,

    /// Follow redirects (unset = follow).
    #[serde(rename = "follow_redir")]
    pub follow_redirects: Option<bool>,

    /// Human readable name reported in snapshots.
    pub display_name: Option<String>,

    /// Probe protocol.
    #[serde(rename = "type")]
    pub protocol: Option<ProbeProtocol>,

    /// Status codes accepted when `check_code` is set.
    pub success_codes: Option<Vec<u16>>,

    /// Validate response status codes.
    #[serde(default)]
    pub check_code: bool,

    /// Probes per cycle (default: 1).
    pub test_count: Option<u32>,

    /// Delay after each probe in milliseconds.
    pub test_delay_ms: Option<u64>,

    /// Sleep between cycles in seconds.
    pub check_period_seconds: Option<u64>,

    /// A failed status check marks the monitor FAILED instead of DEGRADED.
    #[serde(default, rename = "is_critical")]
    pub critical: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_string() {
        assert_eq!(ProbeProtocol::from("http".to_string()), ProbeProtocol::Http);
        assert_eq!(ProbeProtocol::from("https".to_string()), ProbeProtocol::Https);
        assert_eq!(
            ProbeProtocol::from("icmp".to_string()),
            ProbeProtocol::Unsupported("icmp".to_string())
        );
    }

    #[test]
    fn test_minimal_toml() {
        let config: CheckerConfig = toml::from_str(
            r#"
            code_failed = 500

            [[servers]]
            url = "http://127.0.0.1:3000/health"
            type = "http"
            check_period_seconds = 5
            "#,
        )
        .unwrap();

        assert!(config.use_cached_results);
        assert_eq!(config.codes.code_failed, 500);
        assert_eq!(config.codes.code_healthy, 200);
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers[0].protocol, Some(ProbeProtocol::Http));
        assert!(!config.servers[0].critical);
        assert_eq!(config.servers[0].follow_redirects, None);
    }
}
