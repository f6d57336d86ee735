//! Error types shared by every stage of a bench.
//!
//! Nothing in the core recovers locally: an error raised while building a
//! signal, source, or element is returned unchanged to the caller, and a
//! propagation aborts at the first stage that fails.

use thiserror::Error;

/// Errors raised by signal construction, component configuration, and
/// propagation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    /// A signal parameter lies outside its physical domain.
    #[error("Invalid {name} = {value:e}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A component or medium was configured with an incomplete or
    /// contradictory parameter set.
    #[error("Configuration error in '{component}': {message}")]
    Configuration { component: String, message: String },

    /// A stage was handed something other than an optical signal.
    #[error("Type mismatch at '{component}': expected {expected}, got {found}")]
    TypeMismatch {
        component: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl BenchError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        BenchError::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    pub(crate) fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        BenchError::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, BenchError>;
