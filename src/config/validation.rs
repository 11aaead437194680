//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse every allow-list pattern so a bad one refuses startup
//! - Check CORS methods, headers and origins are valid HTTP tokens
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatekeeperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};

use crate::config::schema::{GatekeeperConfig, MAX_LEEWAY_SECS};
use crate::security::pattern::{PathPattern, PatternError};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid listener.bind_address '{0}'")]
    BindAddress(String),
    #[error("access.allow_list: {0}")]
    Pattern(#[from] PatternError),
    #[error("cors.allowed_methods: '{0}' is not a valid HTTP method")]
    CorsMethod(String),
    #[error("cors.allowed_headers: '{0}' is not a valid header name")]
    CorsHeader(String),
    #[error("cors.allowed_origins: '{0}' is not a valid origin")]
    CorsOrigin(String),
    #[error("cors.allowed_origins: '*' cannot be combined with explicit origins")]
    MixedWildcardOrigin,
    #[error("auth.jwt.secret must not be empty")]
    EmptyJwtSecret,
    #[error("auth.jwt.leeway_secs {0} exceeds the maximum of {max}", max = MAX_LEEWAY_SECS)]
    JwtLeeway(u64),
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("invalid observability.metrics_address '{0}'")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatekeeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    for raw in &config.access.allow_list {
        if let Err(e) = PathPattern::parse(raw) {
            errors.push(e.into());
        }
    }

    let cors = &config.cors;
    for method in &cors.allowed_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::CorsMethod(method.clone()));
        }
    }
    for header in &cors.allowed_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::CorsHeader(header.clone()));
        }
    }
    let has_wildcard = cors.allowed_origins.iter().any(|o| o == "*");
    if has_wildcard && cors.allowed_origins.len() > 1 {
        errors.push(ValidationError::MixedWildcardOrigin);
    }
    for origin in cors.allowed_origins.iter().filter(|o| *o != "*") {
        if HeaderValue::from_str(origin).is_err() || !origin.contains("://") {
            errors.push(ValidationError::CorsOrigin(origin.clone()));
        }
    }

    if let Some(jwt) = &config.auth.jwt {
        if jwt.secret.is_empty() {
            errors.push(ValidationError::EmptyJwtSecret);
        }
        if jwt.leeway_secs > MAX_LEEWAY_SECS {
            errors.push(ValidationError::JwtLeeway(jwt.leeway_secs));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
