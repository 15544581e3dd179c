//! Error types and handling for `BreathePrint`

use thiserror::Error;

/// Main error type for the `BreathePrint` library
#[derive(Error, Debug)]
pub enum BreathePrintError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Witness report storage errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl BreathePrintError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            BreathePrintError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            BreathePrintError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            BreathePrintError::Storage { .. } => {
                "Could not access saved witness reports. Check the reports location.".to_string()
            }
            BreathePrintError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            BreathePrintError::Serialization { .. } => {
                "Could not encode the air quality reading.".to_string()
            }
            BreathePrintError::General { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = BreathePrintError::config("bad jitter");
        assert!(matches!(config_err, BreathePrintError::Config { .. }));

        let storage_err = BreathePrintError::storage("keyspace missing");
        assert!(matches!(storage_err, BreathePrintError::Storage { .. }));

        let validation_err = BreathePrintError::validation("invalid coordinates");
        assert!(matches!(validation_err, BreathePrintError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = BreathePrintError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let storage_err = BreathePrintError::storage("test");
        assert!(storage_err.user_message().contains("witness reports"));

        let validation_err = BreathePrintError::validation("lat out of range");
        assert!(validation_err.user_message().contains("lat out of range"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BreathePrintError = io_err.into();
        assert!(matches!(err, BreathePrintError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: BreathePrintError = json_err.into();
        assert!(matches!(err, BreathePrintError::Serialization { .. }));
    }
}
