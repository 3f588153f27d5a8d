//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every field has a default so an empty (or absent) file is a valid
//! configuration; the defaults match the service's documented flag defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Run mode (development, production, test).
    pub mode: RunMode,

    /// HTTP server settings (bind address, timeout, TLS).
    pub server: ServerConfig,

    /// Origin gate settings.
    pub access: AccessConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Run mode, controlling diagnostics verbosity and log format.
///
/// Unknown strings coerce to `Development` instead of failing
/// deserialization; `release` is accepted as an alias for `Production`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RunMode {
    #[default]
    Development,
    Production,
    Test,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
            RunMode::Test => "test",
        }
    }
}

impl From<String> for RunMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "production" | "release" => RunMode::Production,
            "test" => RunMode::Test,
            _ => RunMode::Development,
        }
    }
}

impl From<RunMode> for String {
    fn from(mode: RunMode) -> Self {
        mode.as_str().to_string()
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,

    /// Optional TLS configuration; presence enables TLS.
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 15,
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

/// Origin gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// The exact `Origin` header value allowed through the gate.
    ///
    /// An empty string matches requests that carry no `Origin` header.
    pub allowed_origin: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "0.0.0.0:4200".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or tracing filter directive (trace, debug, info, warn,
    /// error). Unknown values fall back to `info`.
    pub level: String,

    /// Log destination: `stdout` or a file path the process can append to.
    pub path: String,

    /// strftime format for log timestamps.
    pub time_format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            path: "stdout".to_string(),
            time_format: "%d-%m-%Y %H:%M:%S".to_string(),
        }
    }
}
