//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that service link targets can be carried in a `Link` header
//! - Validate value ranges and the bind address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not an `ip:port` or `host:port` address")]
    BindAddress(String),

    #[error("service_links.{field} must not be empty")]
    EmptyLink { field: &'static str },

    #[error("service_links.{field} `{value}` cannot be used in a Link header")]
    InvalidLink { field: &'static str, value: String },

    #[error("recovery.max_logged_body_bytes must be greater than zero when log_body is enabled")]
    ZeroBodyLimit,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Validate a deserialized configuration, collecting every problem.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_link("description", &config.service_links.description, &mut errors);
    check_link("documentation", &config.service_links.documentation, &mut errors);

    if config.recovery.log_body && config.recovery.max_logged_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `ip:port`, `[v6]:port` or `host:port`. Host names are resolved at bind time.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    let Some((host, port)) = value.rsplit_once(':') else {
        return false;
    };
    !host.is_empty()
        && !host.contains([':', '[', ']'])
        && !host.chars().any(char::is_whitespace)
        && port.parse::<u16>().is_ok()
}

fn check_link(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::EmptyLink { field });
        return;
    }
    // `>` would terminate the `<uri>` form early.
    if value.contains(['<', '>']) || HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidLink {
            field,
            value: value.to_string(),
        });
    }
}
