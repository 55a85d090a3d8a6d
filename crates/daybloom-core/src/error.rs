//! Core error types for daybloom-core.
//!
//! Unknown ids are never errors here: stores treat them as silent no-ops.
//! What remains is configuration I/O and input validation. Front ends fold
//! everything, their own I/O and JSON failures included, into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daybloom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No home directory to place the config under
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must not be before start_time ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Value outside its allowed range
    #[error("Value {value} for '{field}' is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Not a `YYYY-MM-DD` day-key
    #[error("Invalid day key '{0}': expected YYYY-MM-DD")]
    InvalidDayKey(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Moving the clock would leave chrono's representable range
    #[error("Cannot move the clock by {0}")]
    ClockOverflow(chrono::Duration),
}

impl ValidationError {
    pub(crate) fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            })
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_accepts_bounds() {
        assert!(ValidationError::check_range("importance", 1, 1, 5).is_ok());
        assert!(ValidationError::check_range("importance", 5, 1, 5).is_ok());
    }

    #[test]
    fn check_range_rejects_outside() {
        let err = ValidationError::check_range("urgency", 6, 1, 5).unwrap_err();
        assert_eq!(err.to_string(), "Value 6 for 'urgency' is outside 1..=5");
    }

    #[test]
    fn validation_converts_into_core_error() {
        let core: CoreError = ValidationError::InvalidDayKey("x".into()).into();
        assert!(matches!(core, CoreError::Validation(_)));
    }

    #[test]
    fn io_and_json_errors_convert_into_core_error() {
        let io: CoreError = std::io::Error::other("pipe closed").into();
        assert_eq!(io.to_string(), "IO error: pipe closed");
        let json: CoreError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(json, CoreError::Json(_)));
    }
}
