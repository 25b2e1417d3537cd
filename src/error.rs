// src/error.rs
use thiserror::Error;

/// Error types for the vasicek-mc library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VasicekError {
    /// Invalid model parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid simulation configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Closed-form formula evaluated outside its domain (e.g. κ = 0)
    #[error("Domain error: {reason}")]
    DomainError { reason: String },

    /// Numerical instability or non-finite estimator output
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for vasicek-mc operations
pub type VasicekResult<T> = Result<T, VasicekError>;

/// Validation utilities
pub mod validation {
    use super::{VasicekError, VasicekResult};

    /// Largest number of time steps accepted for a single path
    pub const MAX_STEPS: usize = 100_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> VasicekResult<()> {
        if value <= 0.0 || value.is_nan() {
            Err(VasicekError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> VasicekResult<()> {
        if value < 0.0 || value.is_nan() {
            Err(VasicekError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> VasicekResult<()> {
        if !value.is_finite() {
            Err(VasicekError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate requested path count. Over-requests are clamped later, not rejected.
    pub fn validate_paths(paths: usize) -> VasicekResult<()> {
        if paths == 0 {
            Err(VasicekError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> VasicekResult<()> {
        if steps == 0 {
            Err(VasicekError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > MAX_STEPS {
            Err(VasicekError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_STEPS),
            })
        } else {
            Ok(())
        }
    }
}
