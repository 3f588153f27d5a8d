//! Origin-gated HTTP service binary.
//!
//! Wires the library pieces together: parse flags, overlay them on the
//! optional config file, install logging, bind the listener, relay process
//! signals and run the server until shutdown completes.

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use origin_gate::config::{
    load_config, validate_config, ConfigError, RunMode, ServiceConfig, TlsConfig,
};
use origin_gate::http::{HttpServer, ServiceInfo};
use origin_gate::lifecycle::{Shutdown, Signals};
use origin_gate::observability::init_logging;

/// Command-line options. Every flag overrides its config-file counterpart.
#[derive(Parser, Debug)]
#[command(name = "origin-gate")]
#[command(about = "Origin-gated HTTP service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// TCP address to listen on
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Exact Origin header value admitted by the gate
    #[arg(long, value_name = "ORIGIN")]
    origin: Option<String>,

    /// Run mode: development, production or test
    #[arg(long, value_name = "MODE")]
    mode: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log destination: "stdout" or a file path
    #[arg(long, value_name = "PATH")]
    log: Option<String>,

    /// strftime pattern for log timestamps
    #[arg(long, value_name = "FORMAT")]
    log_time_format: Option<String>,

    /// TLS certificate file (PEM)
    #[arg(long, value_name = "FILE", requires = "tls_key")]
    tls_cert: Option<String>,

    /// TLS private key file (PEM)
    #[arg(long, value_name = "FILE", requires = "tls_cert")]
    tls_key: Option<String>,
}

impl Cli {
    /// Overlay the given flags onto `config`. Flags that were not passed
    /// leave the file (or default) values untouched.
    fn apply_to(&self, config: &mut ServiceConfig) {
        if let Some(addr) = &self.addr {
            config.server.bind_address = addr.clone();
        }
        if let Some(timeout) = self.timeout {
            config.server.request_timeout_secs = timeout;
        }
        if let Some(origin) = &self.origin {
            config.access.allowed_origin = origin.clone();
        }
        if let Some(mode) = &self.mode {
            config.mode = RunMode::from(mode.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(path) = &self.log {
            config.logging.path = path.clone();
        }
        if let Some(format) = &self.log_time_format {
            config.logging.time_format = format.clone();
        }
        if let (Some(cert), Some(key)) = (&self.tls_cert, &self.tls_key) {
            config.server.tls = Some(TlsConfig {
                cert_path: cert.clone(),
                key_path: key.clone(),
            });
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    cli.apply_to(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    // Guard must outlive the server so file-backed logs keep flushing.
    let _log_guard = init_logging(&config.logging, config.mode)?;

    tracing::warn!(level = %config.logging.level, "log level set");
    tracing::debug!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        allowed_origin = %config.access.allowed_origin,
        mode = config.mode.as_str(),
        log_path = %config.logging.path,
        log_time_format = %config.logging.time_format,
        tls = config.server.tls.is_some(),
        "configuration loaded"
    );

    let info = ServiceInfo::from_build();
    tracing::info!(version = %info.version(), "server starting");

    // Register signal handlers and bind before spawning anything, so a
    // registration failure or a taken port fails up front.
    let signals = Signals::new()?;
    let listener = match TcpListener::bind(&config.server.bind_address) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(
                address = %config.server.bind_address,
                error = %e,
                "failed to bind listener"
            );
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals.relay(shutdown.clone(), info.version().to_string()));

    let server = HttpServer::new(Arc::new(config), info);
    if let Err(e) = server.run(listener, shutdown).await {
        tracing::error!(error = %e, "server failed");
        return Err(e.into());
    }

    tracing::info!("shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::parse_from([
            "origin-gate",
            "--addr",
            "127.0.0.1:9999",
            "--timeout",
            "30",
            "--origin",
            "example.com",
            "--mode",
            "release",
            "--log-level",
            "warn",
        ]);

        let mut config = ServiceConfig::default();
        config.server.bind_address = "0.0.0.0:3000".to_string();
        cli.apply_to(&mut config);

        assert_eq!(config.server.bind_address, "127.0.0.1:9999");
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.access.allowed_origin, "example.com");
        assert_eq!(config.mode, RunMode::Production);
        assert_eq!(config.logging.level, "warn");
        // Untouched settings keep their previous values.
        assert_eq!(config.logging.path, "stdout");
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let cli = Cli::parse_from(["origin-gate"]);
        let mut config = ServiceConfig::default();
        config.access.allowed_origin = "from-file".to_string();
        cli.apply_to(&mut config);
        assert_eq!(config.access.allowed_origin, "from-file");
        assert_eq!(config.server.request_timeout_secs, 15);
    }

    #[test]
    fn tls_flags_populate_the_tls_section() {
        let cli = Cli::parse_from([
            "origin-gate",
            "--tls-cert",
            "/etc/certs/service.pem",
            "--tls-key",
            "/etc/certs/service.key",
        ]);
        let mut config = ServiceConfig::default();
        cli.apply_to(&mut config);

        let tls = config.server.tls.unwrap();
        assert_eq!(tls.cert_path, "/etc/certs/service.pem");
        assert_eq!(tls.key_path, "/etc/certs/service.key");
    }

    #[test]
    fn tls_cert_without_key_is_rejected() {
        let result = Cli::try_parse_from(["origin-gate", "--tls-cert", "/etc/certs/service.pem"]);
        assert!(result.is_err());
    }
}
