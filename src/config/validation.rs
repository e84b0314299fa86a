//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require at least one backend
//! - Require every origin to be an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::BalancerConfig;
use crate::load_balancer::{backend::parse_origin, BalancerError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backends configured")]
    NoBackends,

    #[error("backend #{index} has invalid origin {origin:?}: {reason}")]
    InvalidOrigin {
        index: usize,
        origin: String,
        reason: String,
    },
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for (index, backend) in config.backends.iter().enumerate() {
        if let Err(BalancerError::InvalidOrigin { origin, reason }) = parse_origin(&backend.origin) {
            errors.push(ValidationError::InvalidOrigin { index, origin, reason });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
