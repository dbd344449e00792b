//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status codes, concurrency)
//! - Check that addresses and patterns parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{RouteConfig, ServerConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.max_in_flight must be greater than zero")]
    NoConcurrency,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("route '{route}': status {status} is not a valid HTTP status")]
    Status { route: String, status: u16 },

    #[error("route '{route}': path and pattern are mutually exclusive")]
    PathAndPattern { route: String },

    #[error("route '{route}': invalid pattern: {reason}")]
    Pattern { route: String, reason: String },
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_in_flight == 0 {
        errors.push(ValidationError::NoConcurrency);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    for route in &config.routes {
        validate_route(route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if let Some(status) = route.status {
        if axum::http::StatusCode::from_u16(status).is_err() {
            errors.push(ValidationError::Status {
                route: route.name.clone(),
                status,
            });
        }
    }

    if route.path.is_some() && route.pattern.is_some() {
        errors.push(ValidationError::PathAndPattern {
            route: route.name.clone(),
        });
    }

    if let Some(pattern) = &route.pattern {
        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(ValidationError::Pattern {
                route: route.name.clone(),
                reason: e.to_string(),
            });
        }
    }
}
