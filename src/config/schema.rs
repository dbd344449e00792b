//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Router behavior.
    pub router: RouterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Built-in `.well-known` endpoints.
    pub well_known: WellKnownConfig,

    /// Static routes answered straight from configuration.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind (e.g., "127.0.0.1").
    pub host: String,

    /// Port to bind; 0 picks a free port.
    pub port: u16,

    /// Maximum concurrent dispatches (backpressure).
    pub max_in_flight: usize,

    /// Authority assumed for requests without a `Host` header.
    pub default_authority: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_in_flight: 10_000,
            default_authority: crate::http::DEFAULT_AUTHORITY.to_string(),
        }
    }
}

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Convert unresolved failures into responses instead of propagating them.
    pub guard_unhandled: bool,

    /// Register the hardened error page as a catch-all error handler.
    pub error_pages: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            guard_unhandled: true,
            error_pages: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
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
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// `.well-known` endpoint toggles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WellKnownConfig {
    /// Serve `/.well-known/time`.
    pub time: bool,
}

impl Default for WellKnownConfig {
    fn default() -> Self {
        Self { time: true }
    }
}

/// Which table a static route is registered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    #[default]
    Request,
    Error,
}

/// A static route answering with a fixed status.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Normal or error handler.
    pub kind: RouteKind,

    /// Method tokens; empty matches any method.
    pub methods: Vec<String>,

    /// Exact path to match.
    pub path: Option<String>,

    /// Regex the path must match (mutually exclusive with `path`).
    pub pattern: Option<String>,

    /// Status to answer with; absent means "no content".
    pub status: Option<u16>,
}
