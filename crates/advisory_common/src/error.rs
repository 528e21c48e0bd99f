// --- File: crates/advisory_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all advisory crates.
///
/// Each crate keeps its own error enum and implements `From<CrateError> for AdvisoryError`
/// at the HTTP boundary.
#[derive(Error, Debug)]
pub enum AdvisoryError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The request was well-formed but not applicable in the current state
    #[error("Unprocessable: {0}")]
    UnprocessableError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for AdvisoryError {
    fn status_code(&self) -> u16 {
        match self {
            AdvisoryError::ParseError(_) => 400,
            AdvisoryError::ConfigError(_) => 500,
            AdvisoryError::ValidationError(_) => 400,
            AdvisoryError::ExternalServiceError { .. } => 502,
            AdvisoryError::ConflictError(_) => 409,
            AdvisoryError::NotFoundError(_) => 404,
            AdvisoryError::UnprocessableError(_) => 422,
            AdvisoryError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, AdvisoryError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, AdvisoryError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, AdvisoryError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| AdvisoryError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, AdvisoryError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| AdvisoryError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for AdvisoryError {
    fn from(err: serde_json::Error) -> Self {
        AdvisoryError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AdvisoryError {
    fn from(err: std::io::Error) -> Self {
        AdvisoryError::InternalError(err.to_string())
    }
}

impl From<config::ConfigError> for AdvisoryError {
    fn from(err: config::ConfigError) -> Self {
        AdvisoryError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> AdvisoryError {
    AdvisoryError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> AdvisoryError {
    AdvisoryError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> AdvisoryError {
    AdvisoryError::ConflictError(message.to_string())
}

pub fn unprocessable<T: fmt::Display>(message: T) -> AdvisoryError {
    AdvisoryError::UnprocessableError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> AdvisoryError {
    AdvisoryError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> AdvisoryError {
    AdvisoryError::InternalError(message.to_string())
}
