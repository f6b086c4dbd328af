//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the correlation header is a legal HTTP header name
//! - Validate value ranges (auth id length > 0, timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InstrumentationConfig → Result<(), Vec<ValidationError>>

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::InstrumentationConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("correlation.header {0:?} is not a valid HTTP header name")]
    InvalidHeader(String),

    #[error("request_tracing.message_template must not be empty")]
    EmptyTemplate,

    #[error("request_tracing.auth_id_length must be greater than zero")]
    ZeroAuthIdLength,

    #[error("server.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

pub fn validate_config(config: &InstrumentationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if HeaderName::from_bytes(config.correlation.header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeader(config.correlation.header.clone()));
    }
    if config.request_tracing.message_template.trim().is_empty() {
        errors.push(ValidationError::EmptyTemplate);
    }
    if config.request_tracing.auth_id_length == 0 {
        errors.push(ValidationError::ZeroAuthIdLength);
    }
    if config.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.server.bind_address.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
