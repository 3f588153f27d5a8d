//! Configuration validation.
//!
//! Serde handles syntactic validation; this module covers the semantic
//! checks. Validation is a pure function over the config and reports all
//! problems at once, not just the first one found.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Config field the problem was found in.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check the semantic constraints of a loaded configuration.
///
/// TLS cert/key *existence* is deliberately not checked here; that is an IO
/// concern handled when the TLS config is loaded.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.server.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("not a valid socket address ({e})"),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if let Some(tls) = &config.server.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::new("server.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::new("server.tls.key_path", "must not be empty"));
        }
    }

    if config.logging.path.is_empty() {
        errors.push(ValidationError::new(
            "logging.path",
            "must be \"stdout\" or a writable file path",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        let mut config = ServiceConfig::default();
        config.server.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "server.bind_address");
    }

    #[test]
    fn collects_every_problem() {
        let mut config = ServiceConfig::default();
        config.server.bind_address = "nope".to_string();
        config.server.request_timeout_secs = 0;
        config.server.tls = Some(TlsConfig {
            cert_path: String::new(),
            key_path: String::new(),
        });
        config.logging.path = String::new();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "server.bind_address",
                "server.request_timeout_secs",
                "server.tls.cert_path",
                "server.tls.key_path",
                "logging.path",
            ]
        );
    }

    #[test]
    fn empty_allowed_origin_is_legal() {
        // An empty origin matches requests without an Origin header, which
        // is a supported (if unusual) deployment.
        let mut config = ServiceConfig::default();
        config.access.allowed_origin = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
