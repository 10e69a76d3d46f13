//! Error handling for telemetry processing operations.
//!
//! Malformed input lines are never errors: they are dropped by the
//! pipeline. The variants here cover configuration mistakes, source I/O
//! failures and the external sort collaborator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {kind} unit: {value}")]
    InvalidUnit { kind: &'static str, value: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("External sort failed: {reason}")]
    SortFailed { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl TelemetryError {
    /// Create an invalid distance unit error
    pub fn invalid_distance_unit(value: impl Into<String>) -> Self {
        Self::InvalidUnit {
            kind: "distance",
            value: value.into(),
        }
    }

    /// Create an invalid temperature unit error
    pub fn invalid_temperature_unit(value: impl Into<String>) -> Self {
        Self::InvalidUnit {
            kind: "temperature",
            value: value.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an external sort failure
    pub fn sort_failed(reason: impl Into<String>) -> Self {
        Self::SortFailed {
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error stems from configuration rather than processing
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidUnit { .. } | Self::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_unit_message() {
        let error = TelemetryError::invalid_distance_unit("furlong");
        assert_eq!(error.to_string(), "Invalid distance unit: furlong");
        assert!(error.is_configuration());

        let error = TelemetryError::invalid_temperature_unit("rankine");
        assert_eq!(error.to_string(), "Invalid temperature unit: rankine");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: TelemetryError = io.into();
        assert!(matches!(error, TelemetryError::Io(_)));
        assert!(!error.is_configuration());
    }
}
