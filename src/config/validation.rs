//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (health codes are servable statuses with a body, address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CheckerConfig → Result<(), Vec<ValidationError>>
//! - Per-monitor probe preconditions are NOT checked here; a broken monitor
//!   only disables itself at runtime

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::CheckerConfig;

/// Statuses that never carry a response body.
const BODYLESS_CODES: [u16; 3] = [204, 205, 304];

/// Whether `code` can be sent as the health query status along with the snapshot.
fn is_servable_health_code(code: u16) -> bool {
    (200..=599).contains(&code) && !BODYLESS_CODES.contains(&code)
}

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} = {code} cannot be served as a health status")]
    InvalidHealthCode { field: &'static str, code: u16 },

    #[error("bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("servers array expected in configuration")]
    NoServers,

    #[error("tls {0} must not be empty")]
    EmptyTlsPath(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CheckerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let codes = [
        ("code_healthy", config.codes.code_healthy),
        ("code_degraded", config.codes.code_degraded),
        ("code_failed", config.codes.code_failed),
    ];
    for (field, code) in codes {
        if !is_servable_health_code(code) {
            errors.push(ValidationError::InvalidHealthCode { field, code });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
