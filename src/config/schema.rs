//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the streaming proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Default origin and outbound header profiles.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chunk sizes for streamed bodies.
    pub streaming: StreamingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// A single outbound request header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Default origin configuration.
///
/// Requests resolved against `base_url`'s host are sent with the full
/// `origin_headers` set; every other host only gets `user_agent`. A `Host`
/// entry is always sent as `base_url`'s host and non-default port.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL that non-domain paths are joined against.
    pub base_url: String,

    /// User-Agent sent to every upstream.
    pub user_agent: String,

    /// Ordered header set sent to the default origin.
    pub origin_headers: Vec<HeaderEntry>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://u.m3uts.xyz/".to_string(),
            user_agent: "Ultimate Player/1.0.7".to_string(),
            // Values must match what the origin's player sends.
            origin_headers: vec![
                HeaderEntry::new("Accept-Encoding", "gzip"),
                HeaderEntry::new("Connection", "Keep-Alive"),
                HeaderEntry::new("Host", "u.m3uts.xyz"),
                HeaderEntry::new("User-Agent", "Ultimate Player/1.0.7"),
                HeaderEntry::new("X-Did", "fb6fd3030f4146b7"),
                HeaderEntry::new(
                    "X-Hash",
                    "OV_WTEnM28mJG4gKENQClNMZXjOaxhJ_yJRpTAMSPCMa2JUik77bEWS12kqT00GVooxoYCKoFM39OSDtHCokRA",
                ),
                HeaderEntry::new("X-Version", "10/1.0.7"),
            ],
        }
    }
}

/// Timeout configuration for upstream operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Bound on connecting to the upstream and receiving its response
    /// headers, in seconds. Body streaming is not bounded.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { upstream_secs: 30 }
    }
}

/// Chunk sizes used when relaying bodies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunk size for `.ts` segments.
    pub segment_chunk_size: usize,

    /// Chunk size for any other non-manifest content.
    pub passthrough_chunk_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            segment_chunk_size: 8192,
            passthrough_chunk_size: 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
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

    /// Human-readable or JSON log lines.
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
