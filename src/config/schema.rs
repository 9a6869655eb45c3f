//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The query engine this gateway fronts.
    pub upstream: UpstreamConfig,

    /// Authentication chain settings.
    pub auth: AuthConfig,

    /// Eligibility and transport-trust settings.
    pub security: SecurityConfig,

    /// Server-side request modifiers, in precedence order.
    pub modifiers: Vec<HeaderSourceConfig>,

    /// Outbound client request filters, in precedence order.
    pub client_filters: Vec<HeaderSourceConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration. When present, every request on this
    /// listener counts as arriving over a secure transport.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
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

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:9000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:9000".to_string(),
        }
    }
}

/// Authentication chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Providers to try, in order. Known values: "bearer", "basic".
    pub providers: Vec<String>,

    /// Bearer token settings.
    pub bearer: BearerAuthConfig,

    /// Basic credential settings.
    pub basic: BasicAuthConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            providers: vec!["bearer".to_string()],
            bearer: BearerAuthConfig::default(),
            basic: BasicAuthConfig::default(),
        }
    }
}

/// Static bearer token table: token → principal name.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BearerAuthConfig {
    pub tokens: BTreeMap<String, String>,
}

/// Static basic credential table: user → password.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BasicAuthConfig {
    pub users: BTreeMap<String, String>,
}

/// Eligibility and transport-trust settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Path pattern of the credential-exchange endpoint. A literal path, or
    /// a prefix when ending in `*`.
    pub credential_exchange_path: String,

    /// Trust `X-Forwarded-Proto: https` from a fronting load balancer when
    /// deciding whether a request arrived over a secure transport.
    pub trust_forwarded_proto: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            credential_exchange_path: "/oauth2/token*".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

/// One configured header source (request modifier or client filter).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HeaderSourceConfig {
    /// Source identifier for logging/metrics.
    pub name: String,

    /// Header names this source owns; it is consulted only when at least
    /// one of them is missing from the request.
    pub declares: Vec<String>,

    /// Headers to contribute.
    pub headers: BTreeMap<String, String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
