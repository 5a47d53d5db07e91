//! Error types and handling for the `AirImpact` service

use thiserror::Error;

/// Main error type for the `AirImpact` service
#[derive(Error, Debug)]
pub enum AirImpactError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (missing or out-of-range request data)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// An external provider failed (timeout, non-200, malformed payload)
    #[error("Upstream error from {service}: {message}")]
    Upstream { service: String, message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl AirImpactError {
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

    /// Create a new upstream-provider error
    pub fn upstream<A: Into<String>, B: Into<String>>(service: A, message: B) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
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
            AirImpactError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AirImpactError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirImpactError::Upstream { service, .. } => {
                format!("The {service} service is currently unavailable. Please try again later.")
            }
            AirImpactError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            AirImpactError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            AirImpactError::General { message } => message.clone(),
        }
    }
}
