//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, backoff bounds ordered)
//! - Check that URLs and bind addresses parse
//!
//! Returns every error found, not just the first.

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.network.trim().is_empty() {
        errors.push(ValidationError::new("chain.network", "must not be empty"));
    }
    if config.chain.metadata_path.trim().is_empty() {
        errors.push(ValidationError::new("chain.metadata_path", "must not be empty"));
    }
    if url::Url::parse(&config.chain.explorer_url).is_err() {
        errors.push(ValidationError::new(
            "chain.explorer_url",
            format!("invalid URL '{}'", config.chain.explorer_url),
        ));
    }

    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.rpc.receipt_poll_ms == 0 {
        errors.push(ValidationError::new("rpc.receipt_poll_ms", "must be greater than 0"));
    }
    if config.rpc.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "rpc.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    for url in &config.rpc.failover_urls {
        if url::Url::parse(url).is_err() {
            errors.push(ValidationError::new(
                "rpc.failover_urls",
                format!("invalid URL '{}'", url),
            ));
        }
    }

    if url::Url::parse(&config.proof.endpoint).is_err() {
        errors.push(ValidationError::new(
            "proof.endpoint",
            format!("invalid URL '{}'", config.proof.endpoint),
        ));
    }
    if config.proof.verification_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "proof.verification_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.proof.poll_base_ms == 0 {
        errors.push(ValidationError::new("proof.poll_base_ms", "must be greater than 0"));
    }
    if config.proof.poll_base_ms > config.proof.poll_max_ms {
        errors.push(ValidationError::new(
            "proof.poll_max_ms",
            "must be at least proof.poll_base_ms",
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid bind address '{}'", config.observability.metrics_address),
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

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.rpc.rpc_timeout_secs = 0;
        config.proof.endpoint = "not a url".into();
        config.proof.poll_base_ms = 5000;
        config.proof.poll_max_ms = 100;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "rpc.rpc_timeout_secs",
                "proof.endpoint",
                "proof.poll_max_ms",
                "observability.log_level"
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_explorer_url_must_parse() {
        let mut config = AppConfig::default();
        config.chain.explorer_url = "polygonscan".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "chain.explorer_url");
    }
}
