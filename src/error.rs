// src/error.rs
use thiserror::Error;

/// Error types for the mc-sde library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdeError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Result array and exact-result array differ in length
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Operation requires a model the caller did not supply
    #[error("Model mismatch in '{operation}': {requirement}")]
    ModelMismatch {
        operation: String,
        requirement: String,
    },

    /// Time is not a point of the time grid
    #[error("Time {time} is not a point of the time grid")]
    TimeNotInGrid { time: f64 },

    /// Checked accessor called with an index outside its range
    #[error("Index {index} out of range for {what} (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Numerical instability or degenerate input
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for mc-sde operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a closed range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> SdeResult<()> {
        if value.is_nan() || value < min || value > max {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate correlation parameter
    pub fn validate_correlation(name: &str, rho: f64) -> SdeResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> SdeResult<()> {
        validate_count("paths", paths, 1_000_000_000)
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SdeResult<()> {
        validate_count("steps", steps, 1_000_000)
    }

    /// Validate a count that must be at least one and at most `max`
    pub fn validate_count(field: &str, count: usize, max: usize) -> SdeResult<()> {
        if count == 0 {
            Err(SdeError::InvalidConfiguration {
                field: field.to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if count > max {
            Err(SdeError::InvalidConfiguration {
                field: field.to_string(),
                reason: format!("exceeds maximum allowed ({})", max),
            })
        } else {
            Ok(())
        }
    }
}
