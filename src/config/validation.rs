//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject cookie names browsers would mangle
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BookingConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BookingConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("session.cookie_name '{0}' contains characters not allowed in a cookie name")]
    InvalidCookieName(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &BookingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::Empty("listener.tls.cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::Empty("listener.tls.key_path"));
        }
    }

    if config.database.path.trim().is_empty() {
        errors.push(ValidationError::Empty("database.path"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::Zero("database.max_connections"));
    }

    let cookie_name = &config.session.cookie_name;
    if cookie_name.is_empty() {
        errors.push(ValidationError::Empty("session.cookie_name"));
    } else if !cookie_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        errors.push(ValidationError::InvalidCookieName(cookie_name.clone()));
    }
    if config.session.lifetime_secs == 0 {
        errors.push(ValidationError::Zero("session.lifetime_secs"));
    }
    if config.session.purge_interval_secs == 0 {
        errors.push(ValidationError::Zero("session.purge_interval_secs"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&BookingConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = BookingConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.session.lifetime_secs = 0;
        config.session.cookie_name = "bad name;".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("session.lifetime_secs")));
        assert!(errors.contains(&ValidationError::Zero("timeouts.request_secs")));
        assert!(errors.contains(&ValidationError::InvalidCookieName("bad name;".into())));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = BookingConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "observability.metrics_address: 'nope' is not a valid socket address"
        );
    }

    #[test]
    fn test_empty_tls_paths() {
        let mut config = BookingConfig::default();
        config.listener.tls = Some(TlsConfig {
            cert_path: String::new(),
            key_path: "key.pem".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::Empty("listener.tls.cert_path")]);
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = BookingConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());

        config.observability.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }
}
